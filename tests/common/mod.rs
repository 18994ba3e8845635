//! Shared in-memory fixtures for the HTTP integration suites.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use http_body_util::BodyExt;
use time::OffsetDateTime;
use time::macros::datetime;
use tokio::sync::Mutex;
use tower::ServiceExt;
use uuid::Uuid;

use diwan::application::admin::audit::AdminAuditService;
use diwan::application::admin::education::AdminEducationService;
use diwan::application::admin::experience::AdminExperienceService;
use diwan::application::admin::messages::AdminMessageService;
use diwan::application::admin::posts::AdminPostService;
use diwan::application::admin::profile::AdminProfileService;
use diwan::application::admin::projects::AdminProjectService;
use diwan::application::admin::skills::AdminSkillService;
use diwan::application::blog::BlogService;
use diwan::application::contact::{ContactNotifier, ContactService};
use diwan::application::repos::{
    AuditRepo, CreateEducationParams, CreateExperienceParams, CreatePostParams,
    CreateProjectParams, CreateSkillParams, EducationRepo, EducationWriteRepo, ExperienceRepo,
    ExperienceWriteRepo, MessageStatusCounts, MessagesRepo, MessagesWriteRepo, NewMessageParams,
    PageRequest, PostListScope, PostsRepo, PostsWriteRepo, ProfileRepo, ProjectsRepo,
    ProjectsWriteRepo, RepoError, SkillsRepo, SkillsWriteRepo, UpdateEducationParams,
    UpdateExperienceParams, UpdatePostParams, UpdatePostStatusParams, UpdateProjectParams,
    UpdateSkillParams, UpsertProfileParams,
};
use diwan::application::site::SiteService;
use diwan::application::uploads::{ImageHost, ImageUploadService};
use diwan::domain::entities::{
    AuditLogRecord, EducationRecord, ExperienceRecord, MessageRecord, ProfileRecord,
    ProjectRecord, PostRecord, SkillRecord,
};
use diwan::domain::types::{Locale, Localized, PostStatus};
use diwan::infra::http::{
    AdminState, HealthProbe, PublicState, build_admin_router, build_public_router,
};

pub const ADMIN_TOKEN: &str = "test-admin-token";

#[derive(Default)]
pub struct MemoryRepos {
    pub profile: Mutex<Option<ProfileRecord>>,
    pub projects: Mutex<Vec<ProjectRecord>>,
    pub skills: Mutex<Vec<SkillRecord>>,
    pub experience: Mutex<Vec<ExperienceRecord>>,
    pub education: Mutex<Vec<EducationRecord>>,
    pub posts: Mutex<Vec<PostRecord>>,
    pub messages: Mutex<Vec<MessageRecord>>,
    pub audit: Mutex<Vec<AuditLogRecord>>,
    pub fail_message_insert: bool,
}

fn now() -> OffsetDateTime {
    datetime!(2025-06-01 12:00 UTC)
}

#[async_trait]
impl ProfileRepo for MemoryRepos {
    async fn get_profile(&self) -> Result<Option<ProfileRecord>, RepoError> {
        Ok(self.profile.lock().await.clone())
    }

    async fn upsert_profile(
        &self,
        params: UpsertProfileParams,
    ) -> Result<ProfileRecord, RepoError> {
        let record = ProfileRecord {
            name: params.name,
            headline: params.headline,
            bio: params.bio,
            location: params.location,
            email: params.email,
            phone: params.phone,
            avatar_url: params.avatar_url,
            resume_url: params.resume_url,
            github_url: params.github_url,
            linkedin_url: params.linkedin_url,
            updated_at: now(),
        };
        *self.profile.lock().await = Some(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl ProjectsRepo for MemoryRepos {
    async fn list_projects(&self, featured_only: bool) -> Result<Vec<ProjectRecord>, RepoError> {
        let mut projects: Vec<ProjectRecord> = self
            .projects
            .lock()
            .await
            .iter()
            .filter(|project| !featured_only || project.featured)
            .cloned()
            .collect();
        projects.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(projects)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<ProjectRecord>, RepoError> {
        Ok(self
            .projects
            .lock()
            .await
            .iter()
            .find(|project| project.slug == slug)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ProjectRecord>, RepoError> {
        Ok(self
            .projects
            .lock()
            .await
            .iter()
            .find(|project| project.id == id)
            .cloned())
    }
}

#[async_trait]
impl ProjectsWriteRepo for MemoryRepos {
    async fn create_project(
        &self,
        params: CreateProjectParams,
    ) -> Result<ProjectRecord, RepoError> {
        let record = ProjectRecord {
            id: Uuid::new_v4(),
            slug: params.slug,
            title: params.title,
            summary: params.summary,
            description: params.description,
            cover_image_url: params.cover_image_url,
            gallery_urls: params.gallery_urls,
            tech_stack: params.tech_stack,
            live_url: params.live_url,
            source_url: params.source_url,
            featured: params.featured,
            sort_order: params.sort_order,
            created_at: now(),
            updated_at: now(),
        };
        self.projects.lock().await.push(record.clone());
        Ok(record)
    }

    async fn update_project(
        &self,
        params: UpdateProjectParams,
    ) -> Result<ProjectRecord, RepoError> {
        let mut projects = self.projects.lock().await;
        let project = projects
            .iter_mut()
            .find(|project| project.id == params.id)
            .ok_or(RepoError::NotFound)?;
        project.title = params.title;
        project.summary = params.summary;
        project.description = params.description;
        project.cover_image_url = params.cover_image_url;
        project.gallery_urls = params.gallery_urls;
        project.tech_stack = params.tech_stack;
        project.live_url = params.live_url;
        project.source_url = params.source_url;
        project.featured = params.featured;
        project.sort_order = params.sort_order;
        project.updated_at = now();
        Ok(project.clone())
    }

    async fn delete_project(&self, id: Uuid) -> Result<(), RepoError> {
        let mut projects = self.projects.lock().await;
        let before = projects.len();
        projects.retain(|project| project.id != id);
        if projects.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl SkillsRepo for MemoryRepos {
    async fn list_skills(&self) -> Result<Vec<SkillRecord>, RepoError> {
        let mut skills = self.skills.lock().await.clone();
        skills.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then(a.name.cmp(&b.name)));
        Ok(skills)
    }
}

#[async_trait]
impl SkillsWriteRepo for MemoryRepos {
    async fn create_skill(&self, params: CreateSkillParams) -> Result<SkillRecord, RepoError> {
        let record = SkillRecord {
            id: Uuid::new_v4(),
            name: params.name,
            category: params.category,
            level: params.level,
            sort_order: params.sort_order,
            created_at: now(),
        };
        self.skills.lock().await.push(record.clone());
        Ok(record)
    }

    async fn update_skill(&self, params: UpdateSkillParams) -> Result<SkillRecord, RepoError> {
        let mut skills = self.skills.lock().await;
        let skill = skills
            .iter_mut()
            .find(|skill| skill.id == params.id)
            .ok_or(RepoError::NotFound)?;
        skill.name = params.name;
        skill.category = params.category;
        skill.level = params.level;
        skill.sort_order = params.sort_order;
        Ok(skill.clone())
    }

    async fn delete_skill(&self, id: Uuid) -> Result<(), RepoError> {
        let mut skills = self.skills.lock().await;
        let before = skills.len();
        skills.retain(|skill| skill.id != id);
        if skills.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl ExperienceRepo for MemoryRepos {
    async fn list_experience(&self) -> Result<Vec<ExperienceRecord>, RepoError> {
        let mut entries = self.experience.lock().await.clone();
        entries.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then(b.started_on.cmp(&a.started_on))
        });
        Ok(entries)
    }
}

#[async_trait]
impl ExperienceWriteRepo for MemoryRepos {
    async fn create_experience(
        &self,
        params: CreateExperienceParams,
    ) -> Result<ExperienceRecord, RepoError> {
        let record = ExperienceRecord {
            id: Uuid::new_v4(),
            role: params.role,
            organization: params.organization,
            summary: params.summary,
            started_on: params.started_on,
            ended_on: params.ended_on,
            sort_order: params.sort_order,
            created_at: now(),
        };
        self.experience.lock().await.push(record.clone());
        Ok(record)
    }

    async fn update_experience(
        &self,
        params: UpdateExperienceParams,
    ) -> Result<ExperienceRecord, RepoError> {
        let mut entries = self.experience.lock().await;
        let entry = entries
            .iter_mut()
            .find(|entry| entry.id == params.id)
            .ok_or(RepoError::NotFound)?;
        entry.role = params.role;
        entry.organization = params.organization;
        entry.summary = params.summary;
        entry.started_on = params.started_on;
        entry.ended_on = params.ended_on;
        entry.sort_order = params.sort_order;
        Ok(entry.clone())
    }

    async fn delete_experience(&self, id: Uuid) -> Result<(), RepoError> {
        let mut entries = self.experience.lock().await;
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        if entries.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl EducationRepo for MemoryRepos {
    async fn list_education(&self) -> Result<Vec<EducationRecord>, RepoError> {
        let mut entries = self.education.lock().await.clone();
        entries.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then(b.started_year.cmp(&a.started_year))
        });
        Ok(entries)
    }
}

#[async_trait]
impl EducationWriteRepo for MemoryRepos {
    async fn create_education(
        &self,
        params: CreateEducationParams,
    ) -> Result<EducationRecord, RepoError> {
        let record = EducationRecord {
            id: Uuid::new_v4(),
            degree: params.degree,
            institution: params.institution,
            summary: params.summary,
            started_year: params.started_year,
            ended_year: params.ended_year,
            sort_order: params.sort_order,
            created_at: now(),
        };
        self.education.lock().await.push(record.clone());
        Ok(record)
    }

    async fn update_education(
        &self,
        params: UpdateEducationParams,
    ) -> Result<EducationRecord, RepoError> {
        let mut entries = self.education.lock().await;
        let entry = entries
            .iter_mut()
            .find(|entry| entry.id == params.id)
            .ok_or(RepoError::NotFound)?;
        entry.degree = params.degree;
        entry.institution = params.institution;
        entry.summary = params.summary;
        entry.started_year = params.started_year;
        entry.ended_year = params.ended_year;
        entry.sort_order = params.sort_order;
        Ok(entry.clone())
    }

    async fn delete_education(&self, id: Uuid) -> Result<(), RepoError> {
        let mut entries = self.education.lock().await;
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        if entries.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl PostsRepo for MemoryRepos {
    async fn list_posts(
        &self,
        scope: PostListScope,
        page: PageRequest,
    ) -> Result<Vec<PostRecord>, RepoError> {
        let mut posts: Vec<PostRecord> = self
            .posts
            .lock()
            .await
            .iter()
            .filter(|post| match scope {
                PostListScope::Public => {
                    post.status == PostStatus::Published && post.published_at.is_some()
                }
                PostListScope::Admin { status } => {
                    status.is_none_or(|status| post.status == status)
                }
            })
            .cloned()
            .collect();
        posts.sort_by(|a, b| {
            let a_time = a.published_at.unwrap_or(a.created_at);
            let b_time = b.published_at.unwrap_or(b.created_at);
            b_time.cmp(&a_time)
        });
        Ok(posts
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .collect())
    }

    async fn count_posts(&self, scope: PostListScope) -> Result<u64, RepoError> {
        let count = self
            .posts
            .lock()
            .await
            .iter()
            .filter(|post| match scope {
                PostListScope::Public => {
                    post.status == PostStatus::Published && post.published_at.is_some()
                }
                PostListScope::Admin { status } => {
                    status.is_none_or(|status| post.status == status)
                }
            })
            .count();
        Ok(count as u64)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        Ok(self
            .posts
            .lock()
            .await
            .iter()
            .find(|post| post.slug == slug)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError> {
        Ok(self
            .posts
            .lock()
            .await
            .iter()
            .find(|post| post.id == id)
            .cloned())
    }
}

#[async_trait]
impl PostsWriteRepo for MemoryRepos {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let record = PostRecord {
            id: Uuid::new_v4(),
            slug: params.slug,
            title: params.title,
            excerpt: params.excerpt,
            body_en: params.body_en,
            body_ar: params.body_ar,
            cover_image_url: params.cover_image_url,
            status: params.status,
            published_at: params.published_at,
            created_at: now(),
            updated_at: now(),
        };
        self.posts.lock().await.push(record.clone());
        Ok(record)
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let mut posts = self.posts.lock().await;
        let post = posts
            .iter_mut()
            .find(|post| post.id == params.id)
            .ok_or(RepoError::NotFound)?;
        post.title = params.title;
        post.excerpt = params.excerpt;
        post.body_en = params.body_en;
        post.body_ar = params.body_ar;
        post.cover_image_url = params.cover_image_url;
        post.updated_at = now();
        Ok(post.clone())
    }

    async fn update_post_status(
        &self,
        params: UpdatePostStatusParams,
    ) -> Result<PostRecord, RepoError> {
        let mut posts = self.posts.lock().await;
        let post = posts
            .iter_mut()
            .find(|post| post.id == params.id)
            .ok_or(RepoError::NotFound)?;
        post.status = params.status;
        post.published_at = params.published_at;
        post.updated_at = now();
        Ok(post.clone())
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError> {
        let mut posts = self.posts.lock().await;
        let before = posts.len();
        posts.retain(|post| post.id != id);
        if posts.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl MessagesRepo for MemoryRepos {
    async fn list_messages(
        &self,
        unread_only: bool,
        page: PageRequest,
    ) -> Result<Vec<MessageRecord>, RepoError> {
        let mut messages: Vec<MessageRecord> = self
            .messages
            .lock()
            .await
            .iter()
            .filter(|message| !unread_only || !message.read)
            .cloned()
            .collect();
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(messages
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .collect())
    }

    async fn status_counts(&self) -> Result<MessageStatusCounts, RepoError> {
        let messages = self.messages.lock().await;
        let unread = messages.iter().filter(|message| !message.read).count();
        Ok(MessageStatusCounts {
            total: messages.len() as u64,
            unread: unread as u64,
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MessageRecord>, RepoError> {
        Ok(self
            .messages
            .lock()
            .await
            .iter()
            .find(|message| message.id == id)
            .cloned())
    }
}

#[async_trait]
impl MessagesWriteRepo for MemoryRepos {
    async fn insert_message(&self, params: NewMessageParams) -> Result<MessageRecord, RepoError> {
        if self.fail_message_insert {
            return Err(RepoError::from_persistence("storage offline"));
        }
        let record = MessageRecord {
            id: Uuid::new_v4(),
            name: params.name,
            email: params.email,
            phone: params.phone,
            body: params.body,
            read: false,
            created_at: now(),
        };
        self.messages.lock().await.push(record.clone());
        Ok(record)
    }

    async fn mark_read(&self, id: Uuid) -> Result<MessageRecord, RepoError> {
        let mut messages = self.messages.lock().await;
        let message = messages
            .iter_mut()
            .find(|message| message.id == id)
            .ok_or(RepoError::NotFound)?;
        message.read = true;
        Ok(message.clone())
    }

    async fn delete_message(&self, id: Uuid) -> Result<(), RepoError> {
        let mut messages = self.messages.lock().await;
        let before = messages.len();
        messages.retain(|message| message.id != id);
        if messages.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl AuditRepo for MemoryRepos {
    async fn append_log(&self, record: AuditLogRecord) -> Result<(), RepoError> {
        self.audit.lock().await.push(record);
        Ok(())
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<AuditLogRecord>, RepoError> {
        let mut entries = self.audit.lock().await.clone();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries.truncate(limit as usize);
        Ok(entries)
    }
}

pub struct AlwaysHealthy;

#[async_trait]
impl HealthProbe for AlwaysHealthy {
    async fn healthy(&self) -> bool {
        true
    }
}

pub fn sample_profile() -> ProfileRecord {
    ProfileRecord {
        name: Localized::new("Omar Haddad", Some("عمر حداد".to_string())),
        headline: Localized::new("Software Engineer", Some("مهندس برمجيات".to_string())),
        bio: Localized::plain("Builds web things."),
        location: Localized::new("Cairo, Egypt", Some("القاهرة، مصر".to_string())),
        email: "omar@example.com".to_string(),
        phone: None,
        avatar_url: None,
        resume_url: None,
        github_url: Some("https://github.com/omar".to_string()),
        linkedin_url: None,
        updated_at: now(),
    }
}

pub fn published_post(slug: &str, body_en: &str, body_ar: Option<&str>) -> PostRecord {
    PostRecord {
        id: Uuid::new_v4(),
        slug: slug.to_string(),
        title: Localized::new("First Post", Some("أول تدوينة".to_string())),
        excerpt: Localized::plain("An opening note."),
        body_en: body_en.to_string(),
        body_ar: body_ar.map(str::to_string),
        cover_image_url: None,
        status: PostStatus::Published,
        published_at: Some(now()),
        created_at: now(),
        updated_at: now(),
    }
}

pub fn draft_post(slug: &str) -> PostRecord {
    PostRecord {
        id: Uuid::new_v4(),
        slug: slug.to_string(),
        title: Localized::plain("Unfinished"),
        excerpt: Localized::plain("Not ready."),
        body_en: "draft body".to_string(),
        body_ar: None,
        cover_image_url: None,
        status: PostStatus::Draft,
        published_at: None,
        created_at: now(),
        updated_at: now(),
    }
}

pub fn public_router_with(
    repos: Arc<MemoryRepos>,
    notifiers: Vec<Arc<dyn ContactNotifier>>,
) -> Router {
    let site = Arc::new(SiteService::new(
        repos.clone(),
        repos.clone(),
        repos.clone(),
        repos.clone(),
        repos.clone(),
    ));
    let blog = Arc::new(BlogService::new(repos.clone()));
    let contact = Arc::new(ContactService::new(repos.clone(), notifiers));

    build_public_router(PublicState {
        site,
        blog,
        contact,
        health: Arc::new(AlwaysHealthy),
        default_locale: Locale::En,
    })
}

pub fn admin_router_with(repos: Arc<MemoryRepos>, hosts: Vec<Arc<dyn ImageHost>>) -> Router {
    let audit = AdminAuditService::new(repos.clone());

    let state = AdminState {
        posts: Arc::new(AdminPostService::new(
            repos.clone(),
            repos.clone(),
            audit.clone(),
        )),
        projects: Arc::new(AdminProjectService::new(
            repos.clone(),
            repos.clone(),
            audit.clone(),
        )),
        skills: Arc::new(AdminSkillService::new(
            repos.clone(),
            repos.clone(),
            audit.clone(),
        )),
        experience: Arc::new(AdminExperienceService::new(
            repos.clone(),
            repos.clone(),
            audit.clone(),
        )),
        education: Arc::new(AdminEducationService::new(
            repos.clone(),
            repos.clone(),
            audit.clone(),
        )),
        messages: Arc::new(AdminMessageService::new(
            repos.clone(),
            repos.clone(),
            audit.clone(),
        )),
        profile: Arc::new(AdminProfileService::new(repos.clone(), audit.clone())),
        audit: Arc::new(audit),
        uploads: Arc::new(ImageUploadService::new(hosts)),
        token: ADMIN_TOKEN.into(),
    };

    build_admin_router(state, 12 * 1024 * 1024)
}

pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router
        .clone()
        .oneshot(request)
        .await
        .expect("router response")
}

pub async fn get(router: &Router, uri: &str) -> Response<Body> {
    send(
        router,
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request"),
    )
    .await
}

pub async fn get_admin(router: &Router, uri: &str) -> Response<Body> {
    send(
        router,
        Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}"))
            .body(Body::empty())
            .expect("request"),
    )
    .await
}

pub async fn send_admin_json(
    router: &Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(
        router,
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
    )
    .await
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

pub fn assert_status(response: &Response<Body>, expected: StatusCode) {
    assert_eq!(response.status(), expected);
}
