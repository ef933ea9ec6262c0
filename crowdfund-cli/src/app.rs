//! Terminal front-end. Each route is a page; pages read the stores and
//! dispatch actions, they never touch store state directly.

use anyhow::Result;
use crowdfund_client::{
    auth::{self, AuthBackend},
    models::{LoginRequest, Project, ProjectScope, RegisterRequest},
    routes::Route,
    session::SessionStore,
    view, ActionOutcome, DAppStore,
};
use std::{io::Write, sync::Arc};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::debug;

const HELP: &str = "\
Commands:
  go <path>                    open a page (/, /login, /register, /create-project,
                               /all-projects, /my-projects, /refund, /withdraw)
  connect                      connect the wallet
  logout                       end the session
  next | prev                  page through the project list
  contribute <id> <amount>     contribute ETH to an active project on this page
  withdraw <id>                withdraw a successful project on this page
  help                         show this text
  quit                         exit";

pub struct App {
    store: DAppStore,
    session: SessionStore,
    auth: Arc<dyn AuthBackend>,
    contract_address: String,
    route: Route,
    input: Lines<BufReader<Stdin>>,
}

impl App {
    pub fn new(store: DAppStore, auth: Arc<dyn AuthBackend>, contract_address: String) -> Self {
        Self {
            store,
            session: SessionStore::new(),
            auth,
            contract_address,
            route: Route::Home,
            input: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    pub async fn run(mut self) -> Result<()> {
        print_nav();
        self.navigate(Route::Home).await?;

        loop {
            let label = format!("{}> ", self.route);
            let Some(line) = self.read_line(&label).await? else {
                break;
            };
            let mut words = line.split_whitespace();
            let Some(command) = words.next() else {
                continue;
            };
            let args: Vec<&str> = words.collect();
            debug!(command, ?args, "dispatch");
            self.store.clear_error().await;

            match (command, args.as_slice()) {
                ("quit" | "exit", _) => break,
                ("help", _) => println!("{HELP}"),
                ("go", [path]) => match path.parse::<Route>() {
                    Ok(route) => self.navigate(route).await?,
                    Err(e) => println!("{e}"),
                },
                ("connect", _) => self.connect().await,
                ("logout", _) => {
                    let next = auth::logout(&mut self.session);
                    self.navigate(next).await?;
                }
                ("next", _) => {
                    let outcome = self.store.next_page().await;
                    self.show_list_outcome(outcome).await;
                }
                ("prev", _) => {
                    let outcome = self.store.prev_page().await;
                    self.show_list_outcome(outcome).await;
                }
                ("contribute", [id, amount]) => self.contribute(id, amount).await,
                ("withdraw", [id]) => self.withdraw_listed(id).await,
                _ => println!("Unknown command. Type `help`."),
            }
        }
        println!("Bye.");
        Ok(())
    }

    async fn navigate(&mut self, mut route: Route) -> Result<()> {
        loop {
            route = route.resolve(self.session.is_logged_in());
            self.route = route;
            self.store.clear_error().await;
            println!("\n== {} ==", route.title());
            match self.enter(route).await? {
                Some(next) => route = next,
                None => return Ok(()),
            }
        }
    }

    /// Renders a page. Returns the next route when the page redirects.
    async fn enter(&mut self, route: Route) -> Result<Option<Route>> {
        match route {
            Route::Home => Ok(None),
            Route::Login => self.login_page().await,
            Route::Register => self.register_page().await,
            Route::CreateProject => self.create_project_page().await,
            Route::AllProjects => {
                let projects = self.store.projects().await;
                let page = match projects.scope {
                    ProjectScope::All => projects.current_page,
                    ProjectScope::Mine => 1,
                };
                let outcome = self.store.load_all_projects(page).await;
                self.show_list_outcome(outcome).await;
                Ok(None)
            }
            Route::MyProjects => {
                let outcome = self.store.load_my_projects(1).await;
                self.show_list_outcome(outcome).await;
                Ok(None)
            }
            Route::Refund => {
                let Some(id) = self.read_line("Project ID: ").await? else {
                    return Ok(None);
                };
                let outcome = self.store.refund(&id).await;
                self.report(outcome, "Refund confirmed.").await;
                Ok(None)
            }
            Route::Withdraw => {
                let Some(id) = self.read_line("Project ID: ").await? else {
                    return Ok(None);
                };
                let outcome = self.store.withdraw_funds(&id).await;
                self.report(outcome, "Withdrawal confirmed.").await;
                Ok(None)
            }
        }
    }

    async fn login_page(&mut self) -> Result<Option<Route>> {
        match self.store.account().await {
            Some(account) => println!("Connected as: {account:#x}"),
            None => println!("Wallet not connected (command: connect)."),
        }
        println!("Log in, or leave the username blank to register.");
        let Some(username) = self.read_line("Username: ").await? else {
            return Ok(None);
        };
        if username.is_empty() {
            return Ok(Some(Route::Register));
        }
        let Some(password) = self.read_line("Password: ").await? else {
            return Ok(None);
        };
        let request = LoginRequest { username, password };
        match auth::submit_login(self.auth.as_ref(), &mut self.session, request).await {
            Ok(next) => Ok(Some(next)),
            Err(message) => {
                println!("[ERROR] {message}");
                Ok(None)
            }
        }
    }

    async fn register_page(&mut self) -> Result<Option<Route>> {
        let mut request = RegisterRequest::default();
        for (label, field) in [
            ("Username: ", &mut request.username),
            ("Full Name: ", &mut request.name),
            ("Email: ", &mut request.email),
            ("Password: ", &mut request.password),
        ] {
            let Some(value) = self.read_line(label).await? else {
                return Ok(None);
            };
            *field = value;
        }
        match auth::submit_registration(self.auth.as_ref(), &mut self.session, request).await {
            Ok(next) => Ok(Some(next)),
            Err(message) => {
                println!("[ERROR] {message}");
                Ok(None)
            }
        }
    }

    async fn create_project_page(&mut self) -> Result<Option<Route>> {
        let mut fields = Vec::with_capacity(4);
        for label in ["Name: ", "Description: ", "Goal (ETH): ", "Duration (Days): "] {
            let Some(value) = self.read_line(label).await? else {
                return Ok(None);
            };
            fields.push(value);
        }
        let outcome = self
            .store
            .create_project(&fields[0], &fields[1], &fields[2], &fields[3])
            .await;
        self.report(outcome, "Project created.").await;
        Ok(None)
    }

    async fn connect(&mut self) {
        let outcome = self.store.connect_wallet(&self.contract_address).await;
        if outcome == ActionOutcome::Completed {
            if let Some(account) = self.store.account().await {
                println!("✅ Connected as: {account:#x}");
            }
        } else {
            self.report(outcome, "").await;
        }
    }

    async fn contribute(&mut self, id: &str, amount: &str) {
        let Some(project) = self.listed_project(id).await else {
            return;
        };
        if !view::shows_contribute(project.status) {
            println!("Project {id} is {} and does not take contributions.", project.status);
            return;
        }
        let outcome = self.store.contribute(id, amount).await;
        self.report(outcome, "Contribution confirmed.").await;
        if outcome == ActionOutcome::Completed {
            self.show_projects().await;
        }
    }

    async fn withdraw_listed(&mut self, id: &str) {
        let Some(project) = self.listed_project(id).await else {
            return;
        };
        if !view::shows_withdraw(project.status) {
            println!("Project {id} is {} and cannot be withdrawn.", project.status);
            return;
        }
        let outcome = self.store.withdraw_funds(id).await;
        self.report(outcome, "Withdrawal confirmed.").await;
        if outcome == ActionOutcome::Completed {
            self.show_projects().await;
        }
    }

    async fn listed_project(&self, id: &str) -> Option<Project> {
        if !matches!(self.route, Route::AllProjects | Route::MyProjects) {
            println!("Open /all-projects or /my-projects first.");
            return None;
        }
        let project = self
            .store
            .projects()
            .await
            .items
            .into_iter()
            .find(|p| p.project_id.to_string() == id);
        if project.is_none() {
            println!("Project {id} is not on this page.");
        }
        project
    }

    async fn show_list_outcome(&self, outcome: ActionOutcome) {
        match outcome {
            ActionOutcome::Completed => self.show_projects().await,
            other => self.report(other, "").await,
        }
    }

    async fn show_projects(&self) {
        let page = self.store.projects().await;
        print!("{}", view::render_page(Route::listing(page.scope).title(), &page));
    }

    async fn report(&self, outcome: ActionOutcome, done: &str) {
        match outcome {
            ActionOutcome::Completed => {
                println!("✅ {done}");
                // The follow-up refresh can fail after the transaction went through.
                if let Some(error) = self.store.last_error().await {
                    println!("[ERROR] {error}");
                }
            }
            ActionOutcome::Skipped => {
                if self.store.is_connected().await {
                    println!("Nothing to do.");
                } else {
                    println!("Connect a wallet first (command: connect).");
                }
            }
            ActionOutcome::Failed => {
                if let Some(error) = self.store.last_error().await {
                    println!("[ERROR] {error}");
                }
            }
        }
    }

    async fn read_line(&mut self, label: &str) -> Result<Option<String>> {
        print!("{label}");
        std::io::stdout().flush()?;
        Ok(self.input.next_line().await?.map(|line| line.trim().to_string()))
    }
}

fn print_nav() {
    let links: Vec<String> = Route::NAV
        .iter()
        .map(|route| format!("{} ({})", route.title(), route.path()))
        .collect();
    println!("Crowdfunding DApp | {}", links.join(" | "));
    println!("Type `help` for commands.");
}
