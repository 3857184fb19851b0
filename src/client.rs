//! This module provides a client to connect to the planning API

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::Serialize;
use serde_json::json;
use url::Url;

use crate::admin::{self, AdminDashboard, AdminMetrics, NamedRecord, StaffMember, UserRecord};
use crate::checklist::{Checklist, ItemKey};
use crate::college::{CollegeInfo, CollegeResources, Demographics, MajorStats, SuggestionKind, UserCollege};
use crate::config;
use crate::deadline::SystemDeadline;
use crate::envelope::{parse_body, Envelope, Expect};
use crate::error::{PlannerError, PlannerResult};
use crate::note::{validate_note_fields, NewNote, Note};
use crate::session::Session;
use crate::traits::{ChecklistSource, DeadlineSource, SuggestionSource};


/// A client of the planning API.
///
/// Every request carries the bearer token of the user currently signed in the [`Session`], if any.
#[derive(Clone, Debug)]
pub struct Client {
    base_url: Url,
    session: Session,
    http: reqwest::Client,
}

impl Client {
    /// Create a client. This does not start a connection
    pub fn new<S: AsRef<str>>(base_url: S, session: Session) -> PlannerResult<Self> {
        let mut base_url = Url::parse(base_url.as_ref())?;
        // Endpoints are joined as relative paths, so the base path must be a "directory"
        if base_url.path().ends_with('/') == false {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            session,
            http: reqwest::Client::new(),
        })
    }

    /// Create a client for the API set in [`config::API_BASE_URL`]
    pub fn from_config(session: Session) -> PlannerResult<Self> {
        Self::new(config::get(&config::API_BASE_URL), session)
    }

    pub fn base_url(&self) -> &Url     { &self.base_url }
    pub fn session(&self) -> &Session  { &self.session }

    fn endpoint(&self, path: &str) -> PlannerResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn current_user_id(&self) -> PlannerResult<String> {
        self.session.user_id().ok_or_else(|| {
            log::error!("User not authenticated");
            PlannerError::NotAuthenticated
        })
    }

    async fn get(&self, path: &str, query: &[(&str, &str)], expect: Expect, fallback: &str) -> PlannerResult<Envelope> {
        let url = self.endpoint(path)?;
        log::debug!("GET {}", url);
        let request = self.http.get(url).query(query);
        self.send(request, expect, fallback).await
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B, expect: Expect, fallback: &str) -> PlannerResult<Envelope> {
        let url = self.endpoint(path)?;
        log::debug!("POST {}", url);
        let request = self.http.post(url).json(body);
        self.send(request, expect, fallback).await
    }

    /// Attach the bearer token of the signed-in user, if any
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, expect: Expect, fallback: &str) -> PlannerResult<Envelope> {
        let request = self.authorize(request);
        let result = Self::send_and_check(request, expect, fallback).await;
        if let Err(err) = &result {
            log::warn!("Request failed: {}", err);
        }
        result
    }

    async fn send_and_check(request: RequestBuilder, expect: Expect, fallback: &str) -> PlannerResult<Envelope> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        log::trace!("Got HTTP {}: {}", status, text);
        let body = parse_body(&text)?;
        Envelope::check(body, expect, fallback)
    }


    //
    // Colleges
    //

    /// Look a college up. `Ok(None)` means the server does not know it.
    pub async fn search_college(&self, college_name: &str) -> PlannerResult<Option<CollegeInfo>> {
        let college_name = college_name.trim();
        if college_name.is_empty() {
            return Err(PlannerError::validation("Please enter a college name"));
        }

        match self.get("search-college", &[("name", college_name)], Expect::Status("College found"), "College not found").await {
            Ok(envelope) => Ok(Some(envelope.payload_or_default("data")?)),
            Err(PlannerError::Server{ .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Ask the server to add a college it does not know yet
    pub async fn add_college(&self, college_name: &str) -> PlannerResult<()> {
        self.post("add-college", &json!({ "name": college_name }), Expect::Accepted, "Failed to add college").await?;
        Ok(())
    }

    /// Look a college up, and add it to the server if it is not known yet
    pub async fn search_or_add_college(&self, college_name: &str) -> PlannerResult<CollegeInfo> {
        if let Some(info) = self.search_college(college_name).await? {
            return Ok(info);
        }

        log::info!("College {} not found, adding it", college_name);
        self.add_college(college_name).await?;

        match self.search_college(college_name).await? {
            Some(info) => Ok(info),
            None => Err(PlannerError::server("College not found")),
        }
    }

    /// Follow a college
    pub async fn add_user_college(&self, college_name: &str) -> PlannerResult<()> {
        let user_id = self.current_user_id()?;
        self.post(
            "add-user-college",
            &json!({ "userId": user_id, "collegeName": college_name }),
            Expect::SuccessFlag,
            "Failed to add college to your profile",
        ).await?;
        log::info!("College {} added to the profile", college_name);
        Ok(())
    }

    /// Stop following a college
    pub async fn remove_user_college(&self, college_name: &str) -> PlannerResult<()> {
        let user_id = self.current_user_id()?;
        self.post(
            "remove-user-college",
            &json!({ "userId": user_id, "collegeName": college_name }),
            Expect::SuccessFlag,
            "Failed to remove college from your profile",
        ).await?;
        log::info!("College {} removed from the profile", college_name);
        Ok(())
    }

    pub async fn get_colleges_for_user(&self, user_id: &str) -> PlannerResult<Vec<UserCollege>> {
        self.get("get-user-colleges", &[("userId", user_id)], Expect::Status("Colleges Found For User"), "Colleges not found for user")
            .await?
            .payload_or_default("colleges")
    }

    pub async fn get_college_resources_demographics(&self, user_id: &str, college_name: &str) -> PlannerResult<(CollegeResources, Demographics)> {
        let envelope = self.get(
            "get-college-resources-demographics",
            &[("userId", user_id), ("collegeName", college_name)],
            Expect::Status("Resources and Demographics found"),
            "Resources not found for this college",
        ).await?;
        Ok((envelope.payload_or_default("resources")?, envelope.payload_or_default("demographics")?))
    }

    pub async fn get_major_stats(&self, college_name: &str, major: &str) -> PlannerResult<MajorStats> {
        self.get(
            "get-major-profile",
            &[("collegeName", college_name), ("major", major)],
            Expect::Status("Major Stats Found"),
            "Major stats not found for the given college and major",
        ).await?
        .payload_or_default("data")
    }

    pub async fn get_major_suggestions(&self, query: &str) -> PlannerResult<Vec<String>> {
        self.get("get-major-suggestions", &[("query", query)], Expect::Status("Suggestions found"), "No suggestions found")
            .await?
            .payload_or_default("suggestions")
    }

    pub async fn get_college_suggestions(&self, query: &str) -> PlannerResult<Vec<String>> {
        self.get("get-college-suggestions", &[("query", query)], Expect::Status("Suggestions found"), "No suggestions found")
            .await?
            .payload_or_default("suggestions")
    }


    //
    // Notes
    //

    /// Create a note for the signed-in user. The note is validated before anything is sent.
    pub async fn add_note(&self, note: &NewNote) -> PlannerResult<()> {
        note.validate()?;
        let user_id = self.current_user_id()?;
        self.post(
            "add-note",
            &json!({ "userId": user_id, "note": note }),
            Expect::SuccessFlag,
            "Failed to create note",
        ).await?;
        log::info!("Note {:?} added", note.title);
        Ok(())
    }

    pub async fn remove_note(&self, note_title: &str) -> PlannerResult<()> {
        let user_id = self.current_user_id()?;
        self.post(
            "remove-note",
            &json!({ "userId": user_id, "noteTitle": note_title }),
            Expect::SuccessFlag,
            "Failed to remove note",
        ).await?;
        log::info!("Note {:?} removed", note_title);
        Ok(())
    }

    /// Change the content of a note. Titles cannot be changed.
    pub async fn update_note(&self, user_id: &str, note_title: &str, note_content: &str) -> PlannerResult<()> {
        validate_note_fields(note_title, note_content)?;
        self.post(
            "update-note",
            &json!({ "userId": user_id, "noteTitle": note_title, "noteContent": note_content }),
            Expect::SuccessFlag,
            "Failed to update note.",
        ).await?;
        Ok(())
    }

    pub async fn get_notes_for_user(&self, user_id: &str) -> PlannerResult<Vec<Note>> {
        self.get("get-notes", &[("userId", user_id)], Expect::Status("Notes Found For User"), "Notes not found for user")
            .await?
            .payload_or_default("notes")
    }


    //
    // Checklists and deadlines
    //

    pub async fn get_college_checklist(&self, user_id: &str, college_name: &str) -> PlannerResult<Checklist> {
        self.get(
            "get-college-checklist",
            &[("userId", user_id), ("collegeName", college_name)],
            Expect::Status("Checklist found"),
            "Checklist not found for this college",
        ).await?
        .payload_or_default("checklist")
    }

    pub async fn update_checklist_item(&self, user_id: &str, college_name: &str, key: &ItemKey, completed: bool) -> PlannerResult<()> {
        self.post(
            "update-checklist",
            &json!({
                "userId": user_id,
                "collegeName": college_name,
                "section": key.section,
                "itemIndex": key.index,
                "completed": completed,
            }),
            Expect::SuccessFlag,
            "Failed to update checklist.",
        ).await?;
        Ok(())
    }

    pub async fn replace_checklist(&self, user_id: &str, college_name: &str, checklist: &Checklist) -> PlannerResult<()> {
        self.post(
            "update-checklist",
            &json!({ "userId": user_id, "collegeName": college_name, "checklist": checklist }),
            Expect::SuccessFlag,
            "Failed to update checklist.",
        ).await?;
        Ok(())
    }

    pub async fn get_deadlines_for_user(&self, user_id: &str) -> PlannerResult<Vec<SystemDeadline>> {
        self.get("get-deadlines", &[("userId", user_id)], Expect::Status("Deadlines found"), "Deadlines not found for user")
            .await?
            .payload_or_default("deadlines")
    }


    //
    // Essays
    //

    /// The colleges that have essay prompts
    pub async fn get_colleges_for_essays(&self) -> PlannerResult<Vec<String>> {
        self.get("get-colleges-essays", &[], Expect::SuccessFlag, "No colleges with essay prompts found")
            .await?
            .payload_or_default("colleges")
    }

    pub async fn get_prompts(&self, college_name: &str) -> PlannerResult<Vec<String>> {
        self.get("get-prompts", &[("collegeName", college_name)], Expect::SuccessFlag, "No prompts found for the given college")
            .await?
            .payload_or_default("prompts")
    }

    pub async fn get_essays(&self, college_name: &str, prompt: &str) -> PlannerResult<Vec<String>> {
        self.get(
            "get-essays",
            &[("collegeName", college_name), ("prompt", prompt)],
            Expect::SuccessFlag,
            "No essays found for the given prompt",
        ).await?
        .payload_or_default("essays")
    }


    //
    // Administration
    //

    pub async fn get_staff_role(&self, user_id: &str) -> PlannerResult<String> {
        self.get("get-staff-roles", &[("userId", user_id)], Expect::Status("Staff Role Found for User"), "No Staff Roles Found")
            .await?
            .payload("role")
    }

    pub async fn get_admin_metrics(&self, user_id: &str) -> PlannerResult<AdminMetrics> {
        self.get("admin/metrics", &[("userId", user_id)], Expect::SuccessFlag, "Unable to load metrics")
            .await?
            .payload_or_default("metrics")
    }

    pub async fn get_admin_colleges(&self, user_id: &str) -> PlannerResult<Vec<NamedRecord>> {
        self.get("admin/colleges", &[("userId", user_id)], Expect::SuccessFlag, "Unable to load colleges")
            .await?
            .payload_or_default("colleges")
    }

    pub async fn get_admin_staff(&self, user_id: &str) -> PlannerResult<Vec<StaffMember>> {
        self.get("admin/staff", &[("userId", user_id)], Expect::SuccessFlag, "Unable to load staff")
            .await?
            .payload_or_default("staff")
    }

    pub async fn get_admin_major_colleges(&self, user_id: &str) -> PlannerResult<Vec<NamedRecord>> {
        self.get("admin/major-colleges", &[("userId", user_id)], Expect::SuccessFlag, "Unable to load major colleges")
            .await?
            .payload_or_default("majorColleges")
    }

    pub async fn get_admin_user_colleges(&self, user_id: &str) -> PlannerResult<Vec<UserRecord>> {
        self.get("admin/user-colleges", &[("userId", user_id)], Expect::SuccessFlag, "Unable to load user colleges")
            .await?
            .payload_or_default("userColleges")
    }

    pub async fn get_admin_profile_notes(&self, user_id: &str) -> PlannerResult<Vec<UserRecord>> {
        self.get("admin/profile-notes", &[("userId", user_id)], Expect::SuccessFlag, "Unable to load profile notes")
            .await?
            .payload_or_default("profileNotes")
    }

    /// Load every section of the admin dashboard, after checking the signed-in user is an admin.
    ///
    /// Failing to load the metrics is an error. The record lists that fail to load are left empty.
    pub async fn load_admin_dashboard(&self) -> PlannerResult<AdminDashboard> {
        let user_id = self.current_user_id()?;

        let role = match self.get_staff_role(&user_id).await {
            Ok(role) => role,
            Err(PlannerError::Server{ message }) => return Err(PlannerError::Forbidden(message)),
            Err(err) => return Err(err),
        };
        if admin::is_admin(&role) == false {
            log::warn!("User {} has role {:?}, not allowed on the admin dashboard", user_id, role);
            return Err(PlannerError::Forbidden(format!("role {:?} is not allowed", role)));
        }

        let metrics = self.get_admin_metrics(&user_id).await?;
        Ok(AdminDashboard {
            metrics,
            colleges: or_empty(self.get_admin_colleges(&user_id).await, "colleges"),
            staff: or_empty(self.get_admin_staff(&user_id).await, "staff"),
            major_colleges: or_empty(self.get_admin_major_colleges(&user_id).await, "major colleges"),
            user_colleges: or_empty(self.get_admin_user_colleges(&user_id).await, "user colleges"),
            profile_notes: or_empty(self.get_admin_profile_notes(&user_id).await, "profile notes"),
        })
    }
}

fn or_empty<T>(result: PlannerResult<Vec<T>>, what: &str) -> Vec<T> {
    result.unwrap_or_else(|err| {
        log::warn!("Unable to load {} for the admin dashboard: {}", what, err);
        Vec::new()
    })
}


#[async_trait]
impl DeadlineSource for Client {
    async fn get_system_deadlines(&self, user_id: &str) -> PlannerResult<Vec<SystemDeadline>> {
        self.get_deadlines_for_user(user_id).await
    }

    async fn get_notes(&self, user_id: &str) -> PlannerResult<Vec<Note>> {
        self.get_notes_for_user(user_id).await
    }
}

#[async_trait]
impl ChecklistSource for Client {
    async fn get_checklist(&self, user_id: &str, college_name: &str) -> PlannerResult<Checklist> {
        self.get_college_checklist(user_id, college_name).await
    }

    async fn update_checklist_item(&self, user_id: &str, college_name: &str, key: &ItemKey, completed: bool) -> PlannerResult<()> {
        Client::update_checklist_item(self, user_id, college_name, key, completed).await
    }

    async fn replace_checklist(&self, user_id: &str, college_name: &str, checklist: &Checklist) -> PlannerResult<()> {
        Client::replace_checklist(self, user_id, college_name, checklist).await
    }
}

#[async_trait]
impl SuggestionSource for Client {
    async fn get_suggestions(&self, kind: SuggestionKind, query: &str) -> PlannerResult<Vec<String>> {
        match kind {
            SuggestionKind::College => self.get_college_suggestions(query).await,
            SuggestionKind::Major => self.get_major_suggestions(query).await,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::User;

    #[test]
    fn endpoints() {
        let client = Client::new("https://api.example.com", Session::new()).unwrap();
        assert_eq!(client.endpoint("get-notes").unwrap().as_str(), "https://api.example.com/get-notes");
        assert_eq!(client.endpoint("/admin/metrics").unwrap().as_str(), "https://api.example.com/admin/metrics");

        let client = Client::new("https://example.com/api", Session::new()).unwrap();
        assert_eq!(client.endpoint("get-notes").unwrap().as_str(), "https://example.com/api/get-notes");

        assert!(matches!(Client::new("not a url", Session::new()), Err(PlannerError::Url(_))));
    }

    #[test]
    fn bearer_token() {
        let session = Session::new();
        let client = Client::new("https://api.example.com", session.clone()).unwrap();
        let url = client.endpoint("get-notes").unwrap();

        let request = client.authorize(client.http.get(url.clone())).build().unwrap();
        assert!(request.headers().get(reqwest::header::AUTHORIZATION).is_none());

        session.sign_in(User::new("uid-1").with_id_token("tok"));
        let request = client.authorize(client.http.get(url.clone())).build().unwrap();
        assert_eq!(request.headers().get(reqwest::header::AUTHORIZATION).unwrap(), "Bearer tok");

        // A user without an ID token sends no header
        session.sign_in(User::new("uid-2"));
        let request = client.authorize(client.http.get(url)).build().unwrap();
        assert!(request.headers().get(reqwest::header::AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn refused_before_any_request() {
        // This URL is never contacted: every call below must fail before sending anything
        let client = Client::new("http://unreachable.invalid", Session::new()).unwrap();

        assert!(matches!(client.add_user_college("Rice").await, Err(PlannerError::NotAuthenticated)));
        assert!(matches!(client.remove_note("Ideas").await, Err(PlannerError::NotAuthenticated)));
        assert!(matches!(client.load_admin_dashboard().await, Err(PlannerError::NotAuthenticated)));
        assert!(matches!(client.search_college("   ").await, Err(PlannerError::Validation(_))));
        assert!(matches!(client.update_note("uid", "Ideas", "").await, Err(PlannerError::Validation(_))));

        client.session().sign_in(User::new("uid-1"));
        let too_long = NewNote {
            title: "Essay".to_string(),
            content: "a".repeat(config::MAX_NOTE_LENGTH + 1),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
            deadline: None,
        };
        assert!(matches!(client.add_note(&too_long).await, Err(PlannerError::Validation(_))));
    }
}
