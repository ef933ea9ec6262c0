use std::{fmt, str::FromStr};

use crate::errors::ClientError;
use crate::models::ProjectScope;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    CreateProject,
    AllProjects,
    MyProjects,
    Refund,
    Withdraw,
}

impl Route {
    /// Entries of the navigation bar, in display order.
    pub const NAV: [Route; 5] = [
        Route::CreateProject,
        Route::MyProjects,
        Route::AllProjects,
        Route::Refund,
        Route::Withdraw,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::CreateProject => "/create-project",
            Route::AllProjects => "/all-projects",
            Route::MyProjects => "/my-projects",
            Route::Refund => "/refund",
            Route::Withdraw => "/withdraw",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Crowdfunding DApp",
            Route::Login => "Login",
            Route::Register => "Register",
            Route::CreateProject => "Create Project",
            Route::AllProjects => "All Projects",
            Route::MyProjects => "My Projects",
            Route::Refund => "Refund",
            Route::Withdraw => "Withdraw",
        }
    }

    /// The list page that shows projects of `scope`.
    pub fn listing(scope: ProjectScope) -> Route {
        match scope {
            ProjectScope::All => Route::AllProjects,
            ProjectScope::Mine => Route::MyProjects,
        }
    }

    /// Where the home route lands for the given session.
    pub fn resolve(self, logged_in: bool) -> Route {
        match self {
            Route::Home if logged_in => Route::AllProjects,
            Route::Home => Route::Login,
            other => other,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.trim();
        let path = if path.len() > 1 { path.trim_end_matches('/') } else { path };
        Ok(match path {
            "/" => Route::Home,
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/create-project" => Route::CreateProject,
            "/all-projects" => Route::AllProjects,
            "/my-projects" => Route::MyProjects,
            "/refund" => Route::Refund,
            "/withdraw" => Route::Withdraw,
            other => return Err(ClientError::InvalidInput(format!("unknown route {other}"))),
        })
    }
}
