//! Wire types for the Trello REST API.

use chrono::{DateTime, Utc};
use crewboard_domain::{Member, Ticket};
use serde::Deserialize;

/// A card as returned by `GET /boards/{id}/cards`.
#[derive(Debug, Clone, Deserialize)]
pub struct CardDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(rename = "idList")]
    pub id_list: String,
    #[serde(rename = "idMembers", default)]
    pub id_members: Vec<String>,
}

impl From<CardDto> for Ticket {
    fn from(card: CardDto) -> Self {
        let mut ticket = Ticket::new(card.id, card.name, card.desc, card.id_list);
        for member in card.id_members {
            ticket = ticket.with_member(member);
        }
        ticket
    }
}

/// A list (column) as returned by `GET /boards/{id}/lists`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListDto {
    pub id: String,
    pub name: String,
}

/// A member as returned by `GET /members/{id}` or the board member listing.
#[derive(Debug, Clone, Deserialize)]
pub struct MemberDto {
    pub id: String,
    pub username: String,
    #[serde(rename = "fullName", default)]
    pub full_name: Option<String>,
}

impl MemberDto {
    /// True when either the username or the full name equals `name`,
    /// ignoring case.
    pub fn is_named(&self, name: &str) -> bool {
        self.username.eq_ignore_ascii_case(name)
            || self
                .full_name
                .as_deref()
                .is_some_and(|full| full.eq_ignore_ascii_case(name))
    }
}

impl From<MemberDto> for Member {
    fn from(member: MemberDto) -> Self {
        Member::new(member.id, member.username)
    }
}

/// A comment action as returned by
/// `GET /cards/{id}/actions?filter=commentCard`.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentActionDto {
    pub date: DateTime<Utc>,
    pub data: CommentDataDto,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentDataDto {
    #[serde(default)]
    pub text: String,
}

/// The API returns comment actions newest-first; the port's contract is
/// board order, so sort by timestamp ascending before extracting the text.
pub fn comments_in_board_order(mut actions: Vec<CommentActionDto>) -> Vec<String> {
    actions.sort_by_key(|a| a.date);
    actions.into_iter().map(|a| a.data.text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_dto_maps_to_ticket() {
        let json = r#"{
            "id": "c1",
            "name": "Rate limiting",
            "desc": "Cap requests",
            "idList": "l1",
            "idMembers": ["m1", "m2"]
        }"#;
        let card: CardDto = serde_json::from_str(json).unwrap();
        let ticket: Ticket = card.into();
        assert_eq!(ticket.id.as_str(), "c1");
        assert_eq!(ticket.title, "Rate limiting");
        assert_eq!(ticket.list_id.as_str(), "l1");
        assert_eq!(ticket.member_ids.len(), 2);
    }

    #[test]
    fn test_card_without_desc_or_members_parses() {
        let json = r#"{"id": "c1", "name": "Bare", "idList": "l1"}"#;
        let card: CardDto = serde_json::from_str(json).unwrap();
        assert_eq!(card.desc, "");
        assert!(card.id_members.is_empty());
    }

    #[test]
    fn test_member_name_matching() {
        let member = MemberDto {
            id: "m1".to_string(),
            username: "engmanager".to_string(),
            full_name: Some("Engineering Manager".to_string()),
        };
        assert!(member.is_named("EngManager"));
        assert!(member.is_named("engineering manager"));
        assert!(!member.is_named("engmanager2"));
    }

    #[test]
    fn test_comments_sorted_oldest_first() {
        let json = r#"[
            {"date": "2026-03-02T10:00:00.000Z", "data": {"text": "second"}},
            {"date": "2026-03-01T10:00:00.000Z", "data": {"text": "first"}}
        ]"#;
        let actions: Vec<CommentActionDto> = serde_json::from_str(json).unwrap();
        let comments = comments_in_board_order(actions);
        assert_eq!(comments, vec!["first".to_string(), "second".to_string()]);
    }
}
