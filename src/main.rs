use std::{process, sync::Arc, time::Duration};

use diwan::{
    application::{
        admin::{
            audit::AdminAuditService, education::AdminEducationService,
            experience::AdminExperienceService, messages::AdminMessageService,
            posts::AdminPostService, profile::AdminProfileService, projects::AdminProjectService,
            skills::AdminSkillService,
        },
        blog::BlogService,
        contact::{ContactNotifier, ContactService},
        error::AppError,
        repos::{
            AuditRepo, EducationRepo, EducationWriteRepo, ExperienceRepo, ExperienceWriteRepo,
            MessagesRepo, MessagesWriteRepo, PostsRepo, PostsWriteRepo, ProfileRepo,
            ProjectsRepo, ProjectsWriteRepo, SkillsRepo, SkillsWriteRepo,
        },
        site::SiteService,
        uploads::{ImageHost, ImageUploadService},
    },
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, AdminState, PublicState},
        imagehost::{Base64FormHost, HostCredentials, MultipartFormHost, build_client},
        notify::{SmtpNotifier, TelegramNotifier},
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let (public_state, admin_state) = build_application_context(repositories, &settings)?;

    let public_router = http::build_public_router(public_state);
    let admin_router = http::build_admin_router(
        admin_state,
        settings.uploads.max_request_bytes.get() as usize,
    );

    http::serve(&settings, public_router, admin_router).await
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool =
        PostgresRepositories::connect(database_url, settings.database.max_connections.get())
            .await
            .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn build_application_context(
    repositories: Arc<PostgresRepositories>,
    settings: &config::Settings,
) -> Result<(PublicState, AdminState), AppError> {
    let profile_repo: Arc<dyn ProfileRepo> = repositories.clone();
    let projects_repo: Arc<dyn ProjectsRepo> = repositories.clone();
    let projects_write_repo: Arc<dyn ProjectsWriteRepo> = repositories.clone();
    let skills_repo: Arc<dyn SkillsRepo> = repositories.clone();
    let skills_write_repo: Arc<dyn SkillsWriteRepo> = repositories.clone();
    let experience_repo: Arc<dyn ExperienceRepo> = repositories.clone();
    let experience_write_repo: Arc<dyn ExperienceWriteRepo> = repositories.clone();
    let education_repo: Arc<dyn EducationRepo> = repositories.clone();
    let education_write_repo: Arc<dyn EducationWriteRepo> = repositories.clone();
    let posts_repo: Arc<dyn PostsRepo> = repositories.clone();
    let posts_write_repo: Arc<dyn PostsWriteRepo> = repositories.clone();
    let messages_repo: Arc<dyn MessagesRepo> = repositories.clone();
    let messages_write_repo: Arc<dyn MessagesWriteRepo> = repositories.clone();
    let audit_repo: Arc<dyn AuditRepo> = repositories.clone();

    let site_service = Arc::new(SiteService::new(
        profile_repo.clone(),
        projects_repo.clone(),
        skills_repo.clone(),
        experience_repo.clone(),
        education_repo.clone(),
    ));
    let blog_service = Arc::new(BlogService::new(posts_repo.clone()));
    let contact_service = Arc::new(ContactService::new(
        messages_write_repo.clone(),
        build_notifiers(settings)?,
    ));

    let audit_service = AdminAuditService::new(audit_repo.clone());
    let admin_post_service = Arc::new(AdminPostService::new(
        posts_repo.clone(),
        posts_write_repo.clone(),
        audit_service.clone(),
    ));
    let admin_project_service = Arc::new(AdminProjectService::new(
        projects_repo.clone(),
        projects_write_repo.clone(),
        audit_service.clone(),
    ));
    let admin_skill_service = Arc::new(AdminSkillService::new(
        skills_repo.clone(),
        skills_write_repo.clone(),
        audit_service.clone(),
    ));
    let admin_experience_service = Arc::new(AdminExperienceService::new(
        experience_repo.clone(),
        experience_write_repo.clone(),
        audit_service.clone(),
    ));
    let admin_education_service = Arc::new(AdminEducationService::new(
        education_repo.clone(),
        education_write_repo.clone(),
        audit_service.clone(),
    ));
    let admin_message_service = Arc::new(AdminMessageService::new(
        messages_repo.clone(),
        messages_write_repo.clone(),
        audit_service.clone(),
    ));
    let admin_profile_service = Arc::new(AdminProfileService::new(
        profile_repo.clone(),
        audit_service.clone(),
    ));

    let upload_service = Arc::new(ImageUploadService::new(build_image_hosts(settings)?));

    let public_state = PublicState {
        site: site_service,
        blog: blog_service,
        contact: contact_service,
        health: repositories.clone(),
        default_locale: settings.site.default_locale,
    };

    let admin_state = AdminState {
        posts: admin_post_service,
        projects: admin_project_service,
        skills: admin_skill_service,
        experience: admin_experience_service,
        education: admin_education_service,
        messages: admin_message_service,
        profile: admin_profile_service,
        audit: Arc::new(audit_service),
        uploads: upload_service,
        token: settings.admin.token.as_str().into(),
    };

    Ok((public_state, admin_state))
}

fn build_notifiers(
    settings: &config::Settings,
) -> Result<Vec<Arc<dyn ContactNotifier>>, AppError> {
    let mut notifiers: Vec<Arc<dyn ContactNotifier>> = Vec::new();

    if let Some(email) = settings.notify.email.as_ref() {
        let notifier = SmtpNotifier::new(email)
            .map_err(|err| AppError::unexpected(format!("email notifier: {err}")))?;
        notifiers.push(Arc::new(notifier));
        info!(target = "diwan::notify", channel = "email", "channel enabled");
    }

    if let Some(telegram) = settings.notify.telegram.as_ref() {
        let client = build_client(Duration::from_secs(10))
            .map_err(|err| AppError::unexpected(format!("telegram client: {err}")))?;
        let notifier = TelegramNotifier::new(client, telegram)
            .map_err(|err| AppError::unexpected(format!("telegram notifier: {err}")))?;
        notifiers.push(Arc::new(notifier));
        info!(
            target = "diwan::notify",
            channel = "telegram",
            "channel enabled"
        );
    }

    Ok(notifiers)
}

fn build_image_hosts(settings: &config::Settings) -> Result<Vec<Arc<dyn ImageHost>>, AppError> {
    let mut hosts: Vec<Arc<dyn ImageHost>> = Vec::new();
    let uploads = &settings.uploads;

    if uploads.primary.is_none() && uploads.secondary.is_none() {
        info!(
            target = "diwan::uploads",
            "no image hosts configured; admin uploads will be rejected"
        );
        return Ok(hosts);
    }

    let client = build_client(uploads.request_timeout)
        .map_err(|err| AppError::unexpected(format!("image host client: {err}")))?;

    if let Some(primary) = uploads.primary.as_ref() {
        hosts.push(Arc::new(Base64FormHost::new(
            client.clone(),
            HostCredentials {
                endpoint: primary.endpoint.clone(),
                api_key: primary.api_key.clone(),
            },
        )));
    }

    if let Some(secondary) = uploads.secondary.as_ref() {
        hosts.push(Arc::new(MultipartFormHost::new(
            client,
            HostCredentials {
                endpoint: secondary.endpoint.clone(),
                api_key: secondary.api_key.clone(),
            },
        )));
    }

    Ok(hosts)
}
