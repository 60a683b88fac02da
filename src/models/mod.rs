use serde::{Deserialize, Serialize};

/// Supabase auth session (subset of the `/auth/v1/token` response).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Profile {
    pub id: String,
    pub nickname: String,
    #[serde(default)]
    pub main_character: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Embedded `profiles(nickname)` relation on joined selects.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub(crate) struct ProfileRef {
    #[serde(default)]
    pub nickname: Option<String>,
}

#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
pub(crate) enum RecruitStatus {
    #[strum(to_string = "모집 중")]
    Open,
    #[strum(to_string = "모집 완료")]
    Closed,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct PartyRecruit {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub dungeon: String,
    #[serde(default)]
    pub difficulty: Option<String>,
    pub max_members: i32,
    #[serde(default = "one")]
    pub current_members: i32,
    #[serde(default)]
    pub description: Option<String>,
    pub status: RecruitStatus,
    pub created_at: String,
    #[serde(default)]
    pub author: Option<ProfileRef>,
}

fn one() -> i32 {
    1
}

impl PartyRecruit {
    pub fn is_full(&self) -> bool {
        self.current_members >= self.max_members
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct NewPartyRecruit {
    pub user_id: String,
    pub title: String,
    pub dungeon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    pub max_members: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
pub(crate) enum TradeKind {
    #[strum(to_string = "삽니다")]
    Buy,
    #[strum(to_string = "팝니다")]
    Sell,
}

impl TradeKind {
    /// Value stored in the `trades.kind` column.
    pub fn column_value(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
pub(crate) enum TradeStatus {
    #[strum(to_string = "거래 중")]
    Active,
    #[strum(to_string = "예약 중")]
    Reserved,
    #[strum(to_string = "거래 완료")]
    Completed,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct Trade {
    pub id: i64,
    pub user_id: String,
    pub kind: TradeKind,
    pub item_name: String,
    pub price: i64,
    #[serde(default)]
    pub quantity: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
    pub status: TradeStatus,
    pub created_at: String,
    #[serde(default)]
    pub author: Option<ProfileRef>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct NewTrade {
    pub user_id: String,
    pub kind: TradeKind,
    pub item_name: String,
    pub price: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Message {
    pub id: i64,
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: String,
    #[serde(default)]
    pub sender: Option<ProfileRef>,
    #[serde(default)]
    pub receiver: Option<ProfileRef>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct NewMessage {
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct BlacklistEntry {
    pub id: i64,
    pub blocker_id: String,
    pub blocked_id: String,
    #[serde(default)]
    pub reason: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub blocked: Option<ProfileRef>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct NewBlacklistEntry {
    pub blocker_id: String,
    pub blocked_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

pub(crate) fn display_name(profile: &Option<ProfileRef>, fallback_id: &str) -> String {
    profile
        .as_ref()
        .and_then(|p| p.nickname.clone())
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| {
            let short: String = fallback_id.chars().take(8).collect();
            format!("#{short}")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_party_recruit_row_deserialize_with_embedded_author() {
        let json = r#"{
            "id": 12,
            "user_id": "2b1c6a9e-0000-4000-8000-000000000001",
            "title": "빙하 동굴 4인",
            "dungeon": "빙하 동굴",
            "difficulty": null,
            "max_members": 4,
            "current_members": 4,
            "description": "딜러 구해요",
            "status": "open",
            "created_at": "2024-05-01T12:34:56+00:00",
            "author": {"nickname": "서리"}
        }"#;
        let row: PartyRecruit = serde_json::from_str(json).expect("row should parse");
        assert_eq!(row.status, RecruitStatus::Open);
        assert!(row.is_full());
        assert_eq!(display_name(&row.author, &row.user_id), "서리");
    }

    #[test]
    fn test_trade_row_deserialize_without_optional_columns() {
        let json = r#"{
            "id": 3,
            "user_id": "u1",
            "kind": "sell",
            "item_name": "서리 결정",
            "price": 15000,
            "status": "reserved",
            "created_at": "2024-05-01T00:00:00+00:00"
        }"#;
        let row: Trade = serde_json::from_str(json).expect("row should parse");
        assert_eq!(row.kind, TradeKind::Sell);
        assert_eq!(row.status, TradeStatus::Reserved);
        assert!(row.quantity.is_none() && row.author.is_none());
    }

    #[test]
    fn test_new_trade_skips_empty_optionals() {
        let body = NewTrade {
            user_id: "u1".to_string(),
            kind: TradeKind::Buy,
            item_name: "강화석".to_string(),
            price: 100,
            quantity: None,
            description: None,
        };
        let v = serde_json::to_value(body).expect("should serialize");
        assert_eq!(v["kind"], "buy");
        assert!(v.get("quantity").is_none());
        assert!(v.get("description").is_none());
    }

    #[test]
    fn test_display_name_falls_back_to_short_id() {
        assert_eq!(display_name(&None, "2b1c6a9e-1234"), "#2b1c6a9e");
        let blank = Some(ProfileRef {
            nickname: Some("  ".to_string()),
        });
        assert_eq!(display_name(&blank, "abc"), "#abc");
    }

    #[test]
    fn test_enum_labels() {
        assert_eq!(TradeKind::Sell.to_string(), "팝니다");
        assert_eq!(TradeKind::Sell.column_value(), "sell");
        assert_eq!(RecruitStatus::Closed.to_string(), "모집 완료");
        assert_eq!(TradeStatus::Completed.to_string(), "거래 완료");
    }
}
