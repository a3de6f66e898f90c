//! Zero-sized repository structs, one per table family.
//!
//! Every method takes a `&PgPool` and returns `Result<_, sqlx::Error>`.

pub mod activity_log_repo;
pub mod admin_contact_repo;
pub mod agenda_event_repo;
pub mod artwork_repo;
pub mod budget_repo;
pub mod contact_message_repo;
pub mod digital_art_repo;
pub mod finance_repo;
pub mod newsletter_repo;
pub mod note_repo;
pub mod order_repo;
pub mod session_repo;
pub mod site_info_repo;
pub mod stats_repo;
pub mod task_repo;
pub mod user_repo;

pub use activity_log_repo::ActivityLogRepo;
pub use admin_contact_repo::AdminContactRepo;
pub use agenda_event_repo::AgendaEventRepo;
pub use artwork_repo::ArtworkRepo;
pub use budget_repo::BudgetRepo;
pub use contact_message_repo::ContactMessageRepo;
pub use digital_art_repo::DigitalArtRepo;
pub use finance_repo::FinanceRepo;
pub use newsletter_repo::NewsletterRepo;
pub use note_repo::NoteRepo;
pub use order_repo::OrderRepo;
pub use session_repo::SessionRepo;
pub use site_info_repo::SiteInfoRepo;
pub use stats_repo::StatsRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;
