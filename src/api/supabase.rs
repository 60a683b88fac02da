use super::{error_from_response, ApiError, ApiResult, EnvConfig};
use crate::models::{
    BlacklistEntry, Message, NewBlacklistEntry, NewMessage, NewPartyRecruit, NewTrade,
    PartyRecruit, Profile, RecruitStatus, Session, Trade, TradeKind, TradeStatus,
};
use crate::storage::{load_json, save_json, KeyValueStore, SESSION_KEY};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const PARTY_SELECT: &str = "*,author:profiles!user_id(nickname)";
const TRADE_SELECT: &str = "*,author:profiles!user_id(nickname)";
const INBOX_SELECT: &str = "*,sender:profiles!sender_id(nickname)";
const SENT_SELECT: &str = "*,receiver:profiles!receiver_id(nickname)";
const BLACKLIST_SELECT: &str = "*,blocked:profiles!blocked_id(nickname)";

fn enc(v: &str) -> String {
    urlencoding::encode(v).into_owned()
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    user: AuthUser,
}

impl From<TokenResponse> for Session {
    fn from(t: TokenResponse) -> Self {
        Session {
            access_token: t.access_token,
            refresh_token: t.refresh_token,
            user_id: t.user.id,
            email: t.user.email,
        }
    }
}

/// PostgREST + GoTrue client. Row-level security decides what each call
/// may touch; this type only shapes requests and maps errors.
#[derive(Clone, Debug)]
pub(crate) struct SupabaseClient {
    pub(crate) base_url: String,
    pub(crate) anon_key: String,
    pub(crate) session: Option<Session>,
    store: Arc<dyn KeyValueStore>,
}

impl SupabaseClient {
    pub fn new(
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            anon_key: anon_key.into(),
            session: None,
            store,
        }
    }

    pub fn from_env(env: &EnvConfig, store: Arc<dyn KeyValueStore>) -> Self {
        Self::new(
            env.supabase_url.clone().unwrap_or_default(),
            env.supabase_anon_key.clone().unwrap_or_default(),
            store,
        )
    }

    /// Client with the session persisted in `store`, if any.
    pub fn load_from_storage(env: &EnvConfig, store: Arc<dyn KeyValueStore>) -> Self {
        let mut client = Self::from_env(env, store);
        client.session = load_json::<Session>(client.store.as_ref(), SESSION_KEY);
        client
    }

    pub fn save_to_storage(&self) {
        if let Some(session) = &self.session {
            save_json(self.store.as_ref(), SESSION_KEY, session);
        }
    }

    pub fn clear_storage(&self) {
        self.store.remove(SESSION_KEY);
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.user_id.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn set_session(&mut self, session: Session) {
        self.session = Some(session);
    }

    fn bearer(&self) -> String {
        let token = self
            .session
            .as_ref()
            .map(|s| s.access_token.as_str())
            .unwrap_or(&self.anon_key);
        format!("Bearer {token}")
    }

    pub(crate) fn rest_url(&self, table_and_query: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table_and_query)
    }

    fn ensure_configured(&self) -> ApiResult<()> {
        if self.base_url.is_empty() || self.anon_key.is_empty() {
            return Err(ApiError::NotConfigured("Supabase"));
        }
        Ok(())
    }

    fn require_user(&self) -> ApiResult<String> {
        self.user_id()
            .map(|s| s.to_string())
            .ok_or(ApiError::Unauthorized)
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", &self.anon_key)
            .header("Authorization", self.bearer())
    }

    async fn send<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
        context: &str,
    ) -> ApiResult<T> {
        self.ensure_configured()?;
        let res = self.authed(req).send().await.map_err(ApiError::network)?;
        let status = res.status();
        let body = res.text().await.map_err(ApiError::network)?;
        if !status.is_success() {
            return Err(error_from_response(status.as_u16(), &body, context));
        }
        // PostgREST answers 204 with an empty body when nothing is returned.
        let body = if body.trim().is_empty() { "null" } else { body.as_str() };
        serde_json::from_str(body).map_err(ApiError::parse)
    }

    async fn select<T: DeserializeOwned>(&self, path: &str, context: &str) -> ApiResult<Vec<T>> {
        let req = reqwest::Client::new().get(self.rest_url(path));
        self.send(req, context).await
    }

    async fn insert<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        select: &str,
        body: &B,
        context: &str,
    ) -> ApiResult<T> {
        let req = reqwest::Client::new()
            .post(self.rest_url(&format!("{table}?select={}", enc(select))))
            .header("Prefer", "return=representation")
            .json(body);
        let mut rows: Vec<T> = self.send(req, context).await?;
        if rows.is_empty() {
            return Err(ApiError::parse("insert returned no rows"));
        }
        Ok(rows.swap_remove(0))
    }

    async fn update(
        &self,
        table_and_filter: &str,
        patch: &serde_json::Value,
        context: &str,
    ) -> ApiResult<()> {
        let req = reqwest::Client::new()
            .patch(self.rest_url(table_and_filter))
            .header("Prefer", "return=minimal")
            .json(patch);
        self.send::<serde_json::Value>(req, context).await.map(|_| ())
    }

    async fn delete(&self, table_and_filter: &str, context: &str) -> ApiResult<()> {
        let req = reqwest::Client::new()
            .delete(self.rest_url(table_and_filter))
            .header("Prefer", "return=minimal");
        self.send::<serde_json::Value>(req, context).await.map(|_| ())
    }

    async fn rpc<T: DeserializeOwned>(
        &self,
        function: &str,
        args: &serde_json::Value,
        context: &str,
    ) -> ApiResult<T> {
        let req = reqwest::Client::new()
            .post(self.rest_url(&format!("rpc/{function}")))
            .json(args);
        self.send(req, context).await
    }

    // ── auth ────────────────────────────────────────────────────────────

    pub async fn sign_in(&self, email: &str, password: &str) -> ApiResult<Session> {
        self.ensure_configured()?;
        let res = reqwest::Client::new()
            .post(format!("{}/auth/v1/token?grant_type=password", self.base_url))
            .header("apikey", &self.anon_key)
            .json(&PasswordGrant { email, password })
            .send()
            .await
            .map_err(ApiError::network)?;

        let status = res.status();
        let body = res.text().await.map_err(ApiError::network)?;
        if !status.is_success() {
            // GoTrue answers bad credentials with 400; keep its message.
            return Err(error_from_response(status.as_u16(), &body, "로그인 실패"));
        }
        serde_json::from_str::<TokenResponse>(&body)
            .map(Session::from)
            .map_err(ApiError::parse)
    }

    /// Forgets the session in memory and in storage. Returns the session
    /// that was active so its token can still be revoked.
    pub fn end_session(&mut self) -> Option<Session> {
        self.clear_storage();
        self.session.take()
    }

    /// Revokes `session`'s token server-side. Best effort.
    pub async fn revoke(&self, session: &Session) {
        if self.ensure_configured().is_err() {
            return;
        }
        let _ = reqwest::Client::new()
            .post(format!("{}/auth/v1/logout", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await;
    }

    // ── party recruits ──────────────────────────────────────────────────

    pub async fn list_party_recruits(&self) -> ApiResult<Vec<PartyRecruit>> {
        self.select(
            &format!(
                "party_recruits?select={}&order=created_at.desc",
                enc(PARTY_SELECT)
            ),
            "파티 모집 조회 실패",
        )
        .await
    }

    pub async fn create_party_recruit(
        &self,
        title: &str,
        dungeon: &str,
        difficulty: Option<String>,
        max_members: i32,
        description: Option<String>,
    ) -> ApiResult<PartyRecruit> {
        let body = NewPartyRecruit {
            user_id: self.require_user()?,
            title: title.to_string(),
            dungeon: dungeon.to_string(),
            difficulty,
            max_members,
            description,
        };
        self.insert("party_recruits", PARTY_SELECT, &body, "파티 모집 등록 실패")
            .await
    }

    pub async fn set_party_recruit_status(&self, id: i64, status: RecruitStatus) -> ApiResult<()> {
        self.update(
            &format!("party_recruits?id=eq.{id}"),
            &serde_json::json!({ "status": status }),
            "파티 모집 상태 변경 실패",
        )
        .await
    }

    pub async fn delete_party_recruit(&self, id: i64) -> ApiResult<()> {
        self.delete(&format!("party_recruits?id=eq.{id}"), "파티 모집 삭제 실패")
            .await
    }

    // ── trades ──────────────────────────────────────────────────────────

    pub(crate) fn trades_path(kind: Option<TradeKind>) -> String {
        let mut path = format!("trades?select={}", enc(TRADE_SELECT));
        if let Some(kind) = kind {
            path.push_str(&format!("&kind=eq.{}", kind.column_value()));
        }
        path.push_str("&order=created_at.desc");
        path
    }

    pub async fn list_trades(&self, kind: Option<TradeKind>) -> ApiResult<Vec<Trade>> {
        self.select(&Self::trades_path(kind), "거래글 조회 실패").await
    }

    pub async fn create_trade(
        &self,
        kind: TradeKind,
        item_name: &str,
        price: i64,
        quantity: Option<i32>,
        description: Option<String>,
    ) -> ApiResult<Trade> {
        let body = NewTrade {
            user_id: self.require_user()?,
            kind,
            item_name: item_name.to_string(),
            price,
            quantity,
            description,
        };
        self.insert("trades", TRADE_SELECT, &body, "거래글 등록 실패").await
    }

    pub async fn set_trade_status(&self, id: i64, status: TradeStatus) -> ApiResult<()> {
        self.update(
            &format!("trades?id=eq.{id}"),
            &serde_json::json!({ "status": status }),
            "거래 상태 변경 실패",
        )
        .await
    }

    pub async fn delete_trade(&self, id: i64) -> ApiResult<()> {
        self.delete(&format!("trades?id=eq.{id}"), "거래글 삭제 실패").await
    }

    // ── messages ────────────────────────────────────────────────────────

    pub async fn list_inbox(&self) -> ApiResult<Vec<Message>> {
        let me = self.require_user()?;
        self.select(
            &format!(
                "messages?select={}&receiver_id=eq.{}&order=created_at.desc",
                enc(INBOX_SELECT),
                enc(&me)
            ),
            "받은 쪽지 조회 실패",
        )
        .await
    }

    pub async fn list_sent(&self) -> ApiResult<Vec<Message>> {
        let me = self.require_user()?;
        self.select(
            &format!(
                "messages?select={}&sender_id=eq.{}&order=created_at.desc",
                enc(SENT_SELECT),
                enc(&me)
            ),
            "보낸 쪽지 조회 실패",
        )
        .await
    }

    pub async fn send_message(&self, receiver_id: &str, content: &str) -> ApiResult<Message> {
        let body = NewMessage {
            sender_id: self.require_user()?,
            receiver_id: receiver_id.to_string(),
            content: content.to_string(),
        };
        self.insert("messages", SENT_SELECT, &body, "쪽지 전송 실패").await
    }

    pub async fn mark_message_read(&self, id: i64) -> ApiResult<()> {
        self.update(
            &format!("messages?id=eq.{id}"),
            &serde_json::json!({ "is_read": true }),
            "쪽지 읽음 처리 실패",
        )
        .await
    }

    pub async fn unread_message_count(&self) -> ApiResult<i64> {
        self.require_user()?;
        self.rpc(
            "get_unread_message_count",
            &serde_json::json!({}),
            "안 읽은 쪽지 수 조회 실패",
        )
        .await
    }

    // ── blacklist ───────────────────────────────────────────────────────

    pub async fn list_blacklist(&self) -> ApiResult<Vec<BlacklistEntry>> {
        let me = self.require_user()?;
        self.select(
            &format!(
                "blacklist?select={}&blocker_id=eq.{}&order=created_at.desc",
                enc(BLACKLIST_SELECT),
                enc(&me)
            ),
            "블랙리스트 조회 실패",
        )
        .await
    }

    pub async fn add_to_blacklist(
        &self,
        blocked_id: &str,
        reason: Option<String>,
    ) -> ApiResult<BlacklistEntry> {
        let body = NewBlacklistEntry {
            blocker_id: self.require_user()?,
            blocked_id: blocked_id.to_string(),
            reason,
        };
        self.insert("blacklist", BLACKLIST_SELECT, &body, "블랙리스트 추가 실패")
            .await
            .map_err(rewrite_duplicate_blacklist)
    }

    pub async fn remove_from_blacklist(&self, id: i64) -> ApiResult<()> {
        self.delete(&format!("blacklist?id=eq.{id}"), "블랙리스트 삭제 실패")
            .await
    }

    // ── profiles ────────────────────────────────────────────────────────

    pub async fn get_profile(&self, id: &str) -> ApiResult<Option<Profile>> {
        let rows: Vec<Profile> = self
            .select(
                &format!("profiles?select=*&id=eq.{}&limit=1", enc(id)),
                "프로필 조회 실패",
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    pub async fn find_profile_by_nickname(&self, nickname: &str) -> ApiResult<Option<Profile>> {
        let rows: Vec<Profile> = self
            .select(
                &format!("profiles?select=*&nickname=eq.{}&limit=1", enc(nickname)),
                "프로필 검색 실패",
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    pub async fn upsert_profile(
        &self,
        nickname: &str,
        main_character: Option<String>,
    ) -> ApiResult<Profile> {
        let body = serde_json::json!({
            "id": self.require_user()?,
            "nickname": nickname,
            "main_character": main_character,
        });
        let req = reqwest::Client::new()
            .post(self.rest_url("profiles?on_conflict=id"))
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(&body);
        let mut rows: Vec<Profile> = self.send(req, "프로필 저장 실패").await?;
        if rows.is_empty() {
            return Err(ApiError::parse("upsert returned no rows"));
        }
        Ok(rows.swap_remove(0))
    }
}

pub(crate) fn rewrite_duplicate_blacklist(e: ApiError) -> ApiError {
    if e.is_unique_violation() {
        ApiError::AlreadyBlacklisted
    } else {
        e
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error_from_response;
    use crate::storage::MemoryStore;

    fn client() -> SupabaseClient {
        SupabaseClient::new(
            "https://abc.supabase.co",
            "anon-key",
            Arc::new(MemoryStore::default()),
        )
    }

    fn session(user_id: &str) -> Session {
        Session {
            access_token: "jwt".to_string(),
            refresh_token: None,
            user_id: user_id.to_string(),
            email: None,
        }
    }

    #[test]
    fn test_token_response_contract_deserialize() {
        let json = r#"{
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "r1",
            "user": {"id": "2b1c6a9e", "email": "u@example.com", "aud": "authenticated"}
        }"#;
        let parsed: TokenResponse = serde_json::from_str(json).expect("token response should parse");
        let session = Session::from(parsed);
        assert_eq!(session.access_token, "jwt");
        assert_eq!(session.user_id, "2b1c6a9e");
        assert_eq!(session.email.as_deref(), Some("u@example.com"));
    }

    #[test]
    fn test_bearer_uses_anon_key_until_signed_in() {
        let mut c = client();
        assert!(!c.is_authenticated());
        assert_eq!(c.bearer(), "Bearer anon-key");

        c.set_session(session("u1"));
        assert_eq!(c.bearer(), "Bearer jwt");
        assert_eq!(c.user_id(), Some("u1"));
    }

    #[test]
    fn test_require_user_without_session_is_unauthorized() {
        assert_eq!(client().require_user(), Err(ApiError::Unauthorized));
    }

    #[test]
    fn test_missing_config_is_reported() {
        let c = SupabaseClient::from_env(&EnvConfig::default(), Arc::new(MemoryStore::default()));
        assert_eq!(c.ensure_configured(), Err(ApiError::NotConfigured("Supabase")));
        assert!(client().ensure_configured().is_ok());
    }

    #[test]
    fn test_trades_path_filters_by_kind() {
        let all = SupabaseClient::trades_path(None);
        assert!(all.starts_with("trades?select="));
        assert!(!all.contains("kind=eq"));
        assert!(all.ends_with("&order=created_at.desc"));

        let sells = SupabaseClient::trades_path(Some(TradeKind::Sell));
        assert!(sells.contains("&kind=eq.sell&"));
    }

    #[test]
    fn test_rest_url_and_select_encoding() {
        let c = client();
        assert_eq!(
            c.rest_url("trades?id=eq.1"),
            "https://abc.supabase.co/rest/v1/trades?id=eq.1"
        );
        assert_eq!(enc(BLACKLIST_SELECT), "%2A%2Cblocked%3Aprofiles%21blocked_id%28nickname%29");
    }

    #[test]
    fn test_duplicate_blacklist_insert_surfaces_specific_message() {
        let raw = error_from_response(
            409,
            r#"{"code":"23505","message":"duplicate key value violates unique constraint"}"#,
            "블랙리스트 추가 실패",
        );
        let err = rewrite_duplicate_blacklist(raw);
        assert_eq!(err, ApiError::AlreadyBlacklisted);
        assert_eq!(err.to_string(), "이미 블랙리스트에 등록된 유저입니다.");
    }

    #[test]
    fn test_other_blacklist_errors_pass_through() {
        let raw = error_from_response(403, r#"{"code":"42501","message":"permission denied"}"#, "x");
        assert_eq!(rewrite_duplicate_blacklist(raw.clone()), raw);
    }

    #[test]
    fn test_session_round_trips_through_injected_store() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::default());
        let env = EnvConfig::default();

        let mut c = SupabaseClient::from_env(&env, store.clone());
        c.set_session(session("u1"));
        c.save_to_storage();
        assert!(store.get(SESSION_KEY).is_some());

        let restored = SupabaseClient::load_from_storage(&env, store.clone());
        assert_eq!(restored.user_id(), Some("u1"));

        c.clear_storage();
        assert!(store.get(SESSION_KEY).is_none());
        assert!(!SupabaseClient::load_from_storage(&env, store).is_authenticated());
    }

    #[test]
    fn test_end_session_clears_state_before_any_request() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::default());
        let mut c = SupabaseClient::new("https://abc.supabase.co", "anon-key", store.clone());
        c.set_session(session("u1"));
        c.save_to_storage();

        let ended = c.end_session();
        assert_eq!(ended.map(|s| s.user_id), Some("u1".to_string()));
        assert!(!c.is_authenticated());
        assert!(store.get(SESSION_KEY).is_none());

        // A second failure handler sees nothing left to end.
        assert_eq!(c.end_session(), None);
    }
}
