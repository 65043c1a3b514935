//! Route-Definitionen fuer die Portal-API

use axum::{
    routing::{delete, get},
    Router,
};

use crate::rest::{handlers, server::health, PortalState};

/// Erstellt den vollstaendigen Portal-Router
pub fn portal_router() -> Router<PortalState> {
    Router::new()
        .route("/health", get(health))
        // Anmeldung
        .route(
            "/login",
            get(handlers::auth::login_seite).post(handlers::auth::login),
        )
        .route(
            "/logout",
            get(handlers::auth::logout).post(handlers::auth::logout),
        )
        .route("/me", get(handlers::auth::me))
        // Dashboards
        .route("/dashboard", get(handlers::dashboard::dashboard))
        .route("/admin-dashboard", get(handlers::dashboard::admin_dashboard))
        // Mitglieder
        .route(
            "/members",
            get(handlers::members::list_members).post(handlers::members::create_member),
        )
        .route(
            "/members/:id",
            get(handlers::members::get_member)
                .put(handlers::members::update_member)
                .delete(handlers::members::delete_member),
        )
        // Exekutive und Amtszeiten
        .route(
            "/executives",
            get(handlers::executives::list_executives)
                .post(handlers::executives::assign_executive),
        )
        .route(
            "/executives/:id",
            delete(handlers::executives::remove_executive),
        )
        .route(
            "/tenures",
            get(handlers::executives::list_tenures).post(handlers::executives::add_tenure),
        )
        .route(
            "/tenures/:id",
            get(handlers::executives::get_tenure)
                .put(handlers::executives::update_tenure)
                .delete(handlers::executives::delete_tenure),
        )
        // Finanzen
        .route("/finance/overview", get(handlers::finance::finance_overview))
        .route(
            "/contributions",
            get(handlers::finance::list_contributions)
                .post(handlers::finance::create_contribution),
        )
        .route(
            "/contributions/:id",
            get(handlers::finance::contribution_receipt)
                .put(handlers::finance::update_contribution)
                .delete(handlers::finance::delete_contribution),
        )
        .route("/my-contributions", get(handlers::finance::my_contributions))
        .route(
            "/incomes",
            get(handlers::finance::list_incomes).post(handlers::finance::create_income),
        )
        .route("/incomes/:id", get(handlers::finance::income_receipt))
        .route("/member-lookup", get(handlers::finance::member_lookup))
        .route(
            "/expenses",
            get(handlers::finance::list_expenses).post(handlers::finance::create_expense),
        )
        .route(
            "/expenses/:id",
            get(handlers::finance::get_expense)
                .put(handlers::finance::update_expense)
                .delete(handlers::finance::delete_expense),
        )
        // Projekte
        .route(
            "/projects",
            get(handlers::projects::list_projects).post(handlers::projects::create_project),
        )
        .route(
            "/projects/:id",
            get(handlers::projects::project_detail)
                .put(handlers::projects::update_project)
                .delete(handlers::projects::delete_project),
        )
        // Task Force
        .route(
            "/taskforce",
            get(handlers::taskforce::list_taskforce).post(handlers::taskforce::create_taskforce),
        )
        .route(
            "/taskforce/:id",
            get(handlers::taskforce::get_taskforce)
                .put(handlers::taskforce::update_taskforce)
                .delete(handlers::taskforce::delete_taskforce),
        )
        .route(
            "/motorcycles",
            get(handlers::taskforce::list_motorcycles)
                .post(handlers::taskforce::create_motorcycle),
        )
        .route(
            "/motorcycles/:id",
            get(handlers::taskforce::get_motorcycle)
                .put(handlers::taskforce::update_motorcycle)
                .delete(handlers::taskforce::delete_motorcycle),
        )
        // Ankuendigungen und Protokolle
        .route(
            "/announcements",
            get(handlers::notices::list_announcements)
                .post(handlers::notices::create_announcement),
        )
        .route(
            "/announcements/:id",
            get(handlers::notices::get_announcement)
                .put(handlers::notices::update_announcement)
                .delete(handlers::notices::delete_announcement),
        )
        .route(
            "/minutes",
            get(handlers::notices::list_minutes).post(handlers::notices::create_minutes),
        )
        .route(
            "/minutes/:id",
            get(handlers::notices::get_minutes)
                .put(handlers::notices::update_minutes)
                .delete(handlers::notices::delete_minutes),
        )
}
