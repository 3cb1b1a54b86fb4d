// Tests for rune page reads, writes and summoner spells

use super::test_helpers::*;
use crate::error::Error;
use reqwest::Method;
use serde_json::json;

#[cfg(test)]
mod perks_tests {
    use super::*;

    const PERKS: [i64; 9] = [8010, 9111, 9104, 8014, 8139, 8135, 5005, 5008, 5003];

    /// Test: Writing the active page and reading it back returns the same perks
    #[tokio::test]
    async fn test_set_then_get_round_trip() {
        let transport = FakeTransport::new();
        transport.respond(Method::GET, CURRENT_PAGE_PATH, 200, editable_page(77));
        let client = client_for(&transport);

        let response = client
            .set_active_page("Ultimate Bravery", 8000, &PERKS, 8100)
            .await
            .unwrap();
        assert!(response.is_success());

        let page = client.get_active_page().await.unwrap();
        assert_eq!(page.selected_perk_ids, PERKS.to_vec());
        assert_eq!(page.name, "Ultimate Bravery");
        assert_eq!(page.primary_style_id, 8000);
        assert_eq!(page.sub_style_id, 8100);
        // Untouched server fields survive the write-back
        assert_eq!(page.extra.get("order"), Some(&json!(0)));

        let writes = transport.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].method, Method::PUT);
        assert_eq!(writes[0].path, "/lol-perks/v1/pages/77");
    }

    /// Test: Wrong number of perks is rejected before any request
    #[tokio::test]
    async fn test_wrong_perk_count_is_validation_error() {
        let transport = FakeTransport::new();
        transport.respond(Method::GET, CURRENT_PAGE_PATH, 200, editable_page(77));
        let client = client_for(&transport);

        let too_long: Vec<i64> = PERKS.iter().copied().chain([8000]).collect();
        for perks in [&PERKS[..8], &too_long[..]] {
            let err = client
                .set_active_page("Bad", 8000, perks, 8100)
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "got {:?}", err);
        }
        assert!(transport.requests().is_empty());
    }

    /// Test: A default (non-editable) page is not overwritten
    #[tokio::test]
    async fn test_non_editable_page_is_rejected() {
        let transport = FakeTransport::new();
        let mut page = editable_page(3);
        page["isEditable"] = json!(false);
        transport.respond(Method::GET, CURRENT_PAGE_PATH, 200, page);
        let client = client_for(&transport);

        let err = client
            .set_active_page("Nope", 8000, &PERKS, 8100)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(transport.writes().is_empty());
    }

    /// Test: A server error on the write is surfaced with its status
    #[tokio::test]
    async fn test_write_failure_carries_status() {
        let transport = FakeTransport::new();
        transport.respond(Method::GET, CURRENT_PAGE_PATH, 200, editable_page(77));
        transport.respond(
            Method::PUT,
            "/lol-perks/v1/pages/77",
            400,
            json!({"message": "invalid perk"}),
        );
        let client = client_for(&transport);

        let err = client
            .set_active_page("Page", 8000, &PERKS, 8100)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(400));
    }

    /// Test: All pages are listed
    #[tokio::test]
    async fn test_get_all_pages() {
        let transport = FakeTransport::new();
        let mut default_page = editable_page(1);
        default_page["isEditable"] = json!(false);
        transport.respond(
            Method::GET,
            "/lol-perks/v1/pages",
            200,
            json!([editable_page(77), default_page]),
        );
        let client = client_for(&transport);

        let pages = client.get_all_pages().await.unwrap();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].is_editable);
        assert!(!pages[1].is_editable);
    }

    /// Test: Missing current page is a transport error with status 404
    #[tokio::test]
    async fn test_missing_current_page() {
        let transport = FakeTransport::new();
        let client = client_for(&transport);
        let err = client.get_active_page().await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    /// Test: Summoner spells are patched onto my selection
    #[tokio::test]
    async fn test_set_summoner_spells() {
        let transport = FakeTransport::new();
        transport.respond_raw(
            Method::PATCH,
            "/lol-champ-select/v1/session/my-selection",
            204,
            "",
        );
        let client = client_for(&transport);

        client.set_summoner_spells(4, 14).await.unwrap();
        let writes = transport.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].body, Some(json!({"spell1Id": 4, "spell2Id": 14})));

        let err = client.set_summoner_spells(4, 4).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(transport.writes().len(), 1);
    }
}
