// SPDX-License-Identifier: MIT

use anyhow::bail;
use clap::{Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;

use trial_portal::api::lookups::LookupLoader;
use trial_portal::api::models::auth::{
    ConfirmEmailRequest, PreRegisterRequest, ResetPasswordRequest,
};
use trial_portal::api::models::review::AssignRequestReviewer;
use trial_portal::api::models::user::{AssignReviewerRequest, ProcessApprovalRequest};
use trial_portal::api::models::{LookupKind, PaginationRequest, UserRole};
use trial_portal::api::{ApiClient, LookupApi, ReviewApi, StudyApi};
use trial_portal::script::{AnswerLoader, RunOutcome, WizardRunner};
use trial_portal::wizard::{
    initiate_study, review_wizard, study_wizard, Decision, LogNotifier, Notifier,
    RegistrationUserType, RegistrationWizard, StudyContext,
};
use trial_portal::{PortalConfig, PortalError};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML config file; PORTAL_* environment variables fill the rest
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in and print the session tokens
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// End the current session
    Logout,
    /// Email confirmation and password recovery
    Account {
        #[command(subcommand)]
        command: AccountCommand,
    },
    /// Browse or delete studies
    Studies {
        #[command(subcommand)]
        command: StudiesCommand,
    },
    /// Run the study creation wizard
    Study {
        #[command(subcommand)]
        command: StudyCommand,
    },
    /// Review requests and reviewer assignment
    Requests {
        #[command(subcommand)]
        command: RequestsCommand,
    },
    /// Walk a study's review and approve or reject it
    Review {
        /// Study id
        #[arg(long)]
        id: String,

        #[arg(long, value_enum)]
        decision: DecisionArg,

        /// Required when rejecting
        #[arg(long)]
        comment: Option<String>,

        /// Roles to decide as (OrganizationAdmin, Reviewer or Manager)
        #[arg(long = "role", required = true)]
        roles: Vec<String>,
    },
    /// Manage portal users
    Users {
        #[command(subcommand)]
        command: UsersCommand,
    },
    /// Register a new account from an answer file
    Register {
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Query a lookup list
    Lookups {
        /// country, region, city, organization-type or organization
        kind: String,

        #[arg(long)]
        parent: Option<i64>,

        #[arg(long, default_value = "")]
        search: String,

        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Print named enum lists with their labels
    Enums {
        /// Comma separated, e.g. SiteRequirementsStatus,EthicalApprovalStatus
        names: String,
    },
}

#[derive(Subcommand, Debug)]
enum AccountCommand {
    /// Confirm an email address with the emailed code
    Confirm {
        #[arg(long)]
        email: String,

        #[arg(long)]
        code: String,
    },
    ResendConfirmation {
        #[arg(long)]
        email: String,
    },
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    /// Reserve an account before the registration wizard
    PreRegister {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        /// individual or organization
        #[arg(long, default_value = "individual")]
        user_type: String,
    },
    /// Set a new password using the token from the reset email
    ResetPassword {
        #[arg(long)]
        email: String,

        #[arg(long)]
        token: String,

        #[arg(long)]
        password: String,
    },
}

#[derive(Subcommand, Debug)]
enum StudiesCommand {
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    Delete {
        #[arg(long)]
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum StudyCommand {
    /// Fill and submit every section from an answer file
    Create {
        #[arg(short, long)]
        file: PathBuf,

        /// Continue an existing draft instead of initiating a new study
        #[arg(long)]
        study_id: Option<String>,

        #[arg(long, default_value_t = 1)]
        start_step: usize,
    },
}

#[derive(Subcommand, Debug)]
enum RequestsCommand {
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    Reviewers {
        #[command(flatten)]
        page: PageArgs,
    },
    Assign {
        #[arg(long)]
        study_id: String,

        #[arg(long)]
        reviewer: String,
    },
}

#[derive(Subcommand, Debug)]
enum UsersCommand {
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Create a sub-user of the caller's organization from a YAML body
    AddSubuser {
        #[arg(short, long)]
        file: PathBuf,
    },
    AssignReviewer {
        #[arg(long)]
        user_id: String,

        #[arg(long)]
        reviewer: String,
    },
    /// Accept (or with --reject, refuse) an account approval request
    Approve {
        #[arg(long)]
        request_id: String,

        #[arg(long)]
        reject: bool,

        #[arg(long)]
        comments: Option<String>,
    },
}

#[derive(clap::Args, Debug)]
struct PageArgs {
    #[arg(long, default_value_t = 1)]
    page: u32,

    #[arg(long, default_value_t = 10)]
    size: u32,

    #[arg(long)]
    search: Option<String>,
}

impl PageArgs {
    fn request(&self) -> PaginationRequest {
        let query = PaginationRequest::page(self.page, self.size);
        match &self.search {
            Some(search) => query.with_search(search.clone()),
            None => query,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DecisionArg {
    Approve,
    Reject,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let config = PortalConfig::load(args.config.as_ref())?;
    let client = ApiClient::from_config(&config)?;

    match run(args.command, client).await {
        Err(PortalError::SessionExpired) => bail!("Session expired, log in again"),
        other => other.map_err(anyhow::Error::from),
    }
}

async fn run(command: Commands, client: ApiClient) -> trial_portal::Result<()> {
    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);

    match command {
        Commands::Login { email, password } => {
            let resp = client.login(&email, &password).await?;
            println!("{}", resp.message_or("Logged in"));
            println!("PORTAL_TOKEN={}", resp.data.token);
            println!("PORTAL_REFRESH_TOKEN={}", resp.data.refresh_token);
            let roles: Vec<&str> = resp.data.roles.iter().map(|r| r.as_str()).collect();
            println!("roles: {}", roles.join(", "));
        }
        Commands::Logout => {
            client.logout().await?;
            println!("Logged out");
        }
        Commands::Account { command } => {
            let message = match command {
                AccountCommand::Confirm { email, code } => client
                    .confirm_email(&ConfirmEmailRequest { email, code })
                    .await?
                    .message_or("Done"),
                AccountCommand::ResendConfirmation { email } => client
                    .resend_email_confirmation(&email)
                    .await?
                    .message_or("Done"),
                AccountCommand::ForgotPassword { email } => {
                    client.forgot_password(&email).await?.message_or("Done")
                }
                AccountCommand::PreRegister {
                    email,
                    password,
                    user_type,
                } => {
                    let user_type: RegistrationUserType = user_type.parse()?;
                    let body = PreRegisterRequest {
                        email,
                        confirm_password: password.clone(),
                        password,
                        user_type: user_type.user_type().code(),
                    };
                    let resp = client.pre_register(&body).await?;
                    println!("id: {}", resp.data.id);
                    resp.message_or("Done")
                }
                AccountCommand::ResetPassword {
                    email,
                    token,
                    password,
                } => {
                    let body = ResetPasswordRequest {
                        token,
                        email,
                        new_password: password.clone(),
                        confirm_password: password,
                    };
                    client.reset_password(&body).await?.message_or("Done")
                }
            };
            println!("{}", message);
        }
        Commands::Studies { command } => match command {
            StudiesCommand::List { page } => {
                let studies = client.list_studies(&page.request()).await?;
                for s in &studies.data {
                    println!(
                        "{}\t{}\t{}\t{}",
                        s.study_id, s.registration_number, s.status, s.scientific_title
                    );
                }
                print_page(studies.current_page, studies.number_of_pages, studies.total_rows_count);
            }
            StudiesCommand::Delete { id } => {
                let resp = client.delete_study(&id).await?;
                println!("{}", resp.message_or("Study deleted"));
            }
        },
        Commands::Study { command } => match command {
            StudyCommand::Create {
                file,
                study_id,
                start_step,
            } => {
                let answers = AnswerLoader::load_study(&file)?;
                let api: Arc<dyn StudyApi> = Arc::new(client);
                let context = match study_id {
                    Some(id) => StudyContext::existing(id),
                    None => initiate_study(api.as_ref()).await?,
                };
                println!("Study {} (record {})", context.study_id, context.record_number);

                let mut wizard = study_wizard(api, context, notifier);
                wizard.start_at(start_step).await?;
                report(WizardRunner::new().run(&mut wizard, &answers.sections).await?)?;
            }
        },
        Commands::Requests { command } => match command {
            RequestsCommand::List { page } => {
                let requests = client.list_requests(&page.request()).await?;
                for r in &requests.data {
                    println!("{}\t{}\t{}\t{}", r.study_id, r.record_number, r.status, r.study_name);
                }
                print_page(requests.current_page, requests.number_of_pages, requests.total_rows_count);
            }
            RequestsCommand::Reviewers { page } => {
                let reviewers = client.list_reviewers(&page.request()).await?;
                for r in &reviewers.data {
                    println!("{}\t{}\t{} assigned", r.id, r.name_en, r.assigned_studies_count);
                }
                print_page(reviewers.current_page, reviewers.number_of_pages, reviewers.total_rows_count);
            }
            RequestsCommand::Assign { study_id, reviewer } => {
                let body = AssignRequestReviewer {
                    study_id,
                    reviewer_user_id: reviewer,
                };
                let resp = client.assign_reviewer(&body).await?;
                println!("{}", resp.message_or("Reviewer assigned"));
            }
        },
        Commands::Review {
            id,
            decision,
            comment,
            roles,
        } => {
            let roles = parse_roles(&roles)?;
            let decision = match decision {
                DecisionArg::Approve => Decision::Approve { comment },
                DecisionArg::Reject => Decision::Reject {
                    comment: comment.unwrap_or_default(),
                },
            };

            let api = Arc::new(client);
            let mut wizard = review_wizard(api.clone(), api, &id, roles, notifier);
            wizard.start().await?;
            report(WizardRunner::new().run_review(&mut wizard, decision).await?)?;
        }
        Commands::Users { command } => match command {
            UsersCommand::List { page } => {
                let users = client.list_users(&page.request()).await?;
                for u in &users.data {
                    println!(
                        "{}\t{}\t{}\t{}",
                        u.id,
                        u.email,
                        u.user_type_text,
                        if u.is_approved { "approved" } else { "pending" }
                    );
                }
                print_page(users.current_page, users.number_of_pages, users.total_rows_count);
            }
            UsersCommand::AddSubuser { file } => {
                let body = AnswerLoader::load_subuser(&file)?;
                let resp = client.register_subuser(&body).await?;
                println!("{}", resp.message_or("Sub-user created"));
            }
            UsersCommand::AssignReviewer { user_id, reviewer } => {
                let body = AssignReviewerRequest {
                    user_id,
                    assigned_user_id: reviewer,
                };
                let resp = client.assign_user_reviewer(&body).await?;
                println!("{}", resp.message_or("Reviewer assigned"));
            }
            UsersCommand::Approve {
                request_id,
                reject,
                comments,
            } => {
                let body = ProcessApprovalRequest {
                    approval_request_id: request_id,
                    comments,
                    is_approved: !reject,
                };
                let resp = client.process_approval(&body).await?;
                println!("{}", resp.message_or("Request processed"));
            }
        },
        Commands::Register { file } => {
            let answers = AnswerLoader::load_registration(&file)?;
            let mut registration = RegistrationWizard::new(Arc::new(client), notifier);
            registration.select(answers.user_type).await?;
            let outcome = WizardRunner::new()
                .run(registration.wizard_mut()?, &answers.stages)
                .await?;
            report(outcome)?;
        }
        Commands::Lookups {
            kind,
            parent,
            search,
            page,
        } => {
            let kind: LookupKind = kind.parse().map_err(PortalError::Other)?;
            let loader = LookupLoader::new(Arc::new(client), kind);
            let options = if kind.requires_parent() {
                loader.load_children(parent, &search, page).await?
            } else {
                loader.load(&search, page).await?
            };
            if options.data.is_empty() && !options.message.is_empty() {
                println!("{}", options.message);
            }
            for o in &options.data {
                println!("{}\t{}", o.value, o.label);
            }
        }
        Commands::Enums { names } => {
            let resp = client.lookup_enum(&names).await?;
            println!("{}", serde_json::to_string_pretty(&resp.data)?);
        }
    }
    Ok(())
}

fn parse_roles(roles: &[String]) -> trial_portal::Result<Vec<UserRole>> {
    roles
        .iter()
        .map(|r| -> trial_portal::Result<UserRole> {
            match serde_json::from_value::<UserRole>(serde_json::Value::String(r.clone()))? {
                UserRole::Unknown => Err(PortalError::other(format!("Unknown role: {}", r))),
                role => Ok(role),
            }
        })
        .collect()
}

fn print_page(current: u32, pages: u32, total: u64) {
    println!("page {}/{} ({} total)", current, pages, total);
}

fn report(outcome: RunOutcome) -> trial_portal::Result<()> {
    match outcome {
        RunOutcome::Finished(terminal) => {
            println!("{}", terminal.title);
            println!("{}", terminal.description);
            println!("next: {}", terminal.exit_route);
            Ok(())
        }
        RunOutcome::Rejected { stage, errors } => {
            for (field, message) in errors.iter() {
                eprintln!("{}.{}: {}", stage, field, message);
            }
            Err(PortalError::Validation(errors))
        }
        RunOutcome::Failed { stage, message } => {
            Err(PortalError::other(format!("{}: {}", stage, message)))
        }
    }
}
