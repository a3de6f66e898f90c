pub mod admin;
pub mod artworks;
pub mod auth;
pub mod health;
pub mod orders;
pub mod site;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login, /auth/register, /auth/refresh       public
/// /auth/logout, /auth/me                           auth
///
/// /users                                           list (admin)
/// /users/change-password                           change own password (auth)
/// /users/{id}                                      get, update (admin or self), deactivate (admin)
///
/// /artworks                                        list, create
/// /artworks/featured                               featured listing
/// /artworks/slug/{slug}                            get by slug
/// /artworks/{id}                                   get, update, delete
/// /artworks/{id}/status                            availability flags (admin)
/// /artworks/{id}/like                              toggle like (auth)
///
/// /digital-art                                     list, create
/// /digital-art/by-original/{artwork_id}            prints of one original
/// /digital-art/{id}                                get, update, delete
/// /digital-art/{id}/availability                   product availability (admin)
/// /digital-art/{id}/size-availability              per-size availability (admin)
///
/// /orders                                          list (admin), create (public)
/// /orders/my                                       own orders (auth)
/// /orders/{id}                                     get (owner or admin)
/// /orders/{id}/status                              transition (admin)
///
/// /payments/create-intent                          Stripe PaymentIntent
/// /payments/confirm                                manual confirmation (auth)
/// /payments/webhook                                Stripe webhook
/// /payments/order/{order_id}                       payment summary
///
/// /checkout/create-preference                      MercadoPago preference
/// /checkout/payment-status/{payment_id}            MercadoPago payment lookup
///
/// /webhook/stripe                                  Stripe webhook
/// /webhook/mercadopago                             MercadoPago notifications
///
/// /upload/image                                    upload (admin)
/// /upload/image/{*public_id}                       delete (admin)
///
/// /contact                                         submit (public), list (admin)
/// /contact/{id}                                    get, delete (admin)
/// /contact/{id}/status                             status (admin)
///
/// /newsletter/subscribe                            subscribe (public)
/// /newsletter/unsubscribe/{email}                  unsubscribe (public)
/// /newsletter/subscribers                          list (admin)
///
/// /stats/dashboard, /stats/sales, /stats/artworks  admin dashboards
///
/// /siteinfo                                        get, update (admin)
/// /siteinfo/biography, /contact, /legal            sections
/// /siteinfo/legal/privacy, /legal/terms            get, update (admin)
///
/// /admin/contacts/...                              CRM
/// /admin/finances/...                              ledger, reports, budgets
/// /admin/agenda/...                                events, calendar, tasks
/// /admin/notes/...                                 notes and attachments
/// /admin/activity                                  recent activity feed
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/artworks", artworks::router())
        .nest("/digital-art", artworks::digital_art_router())
        .nest("/orders", orders::router())
        .nest("/payments", orders::payments_router())
        .nest("/checkout", orders::checkout_router())
        .nest("/webhook", orders::webhook_router())
        .nest("/upload", site::upload_router())
        .nest("/contact", site::contact_router())
        .nest("/newsletter", site::newsletter_router())
        .nest("/stats", site::stats_router())
        .nest("/siteinfo", site::site_info_router())
        .nest("/admin", admin::router())
}
