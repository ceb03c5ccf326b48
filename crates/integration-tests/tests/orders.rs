//! Order drafts and the messaging hand-off.

use reqwest::StatusCode;
use rmp_portal_integration_tests::{TEST_WHATSAPP_NUMBER, TestPortal, TestClient};

async fn customer(portal: &TestPortal) -> TestClient {
    let browser = portal.browser();
    browser.login_customer("Ravi Patel", "9876543210").await;
    browser
}

fn decoded_message(location: &str) -> String {
    let prefix = format!("https://wa.me/{TEST_WHATSAPP_NUMBER}?text=");
    let encoded = location
        .strip_prefix(&prefix)
        .unwrap_or_else(|| panic!("unexpected deep link: {location}"));
    urlencoding::decode(encoded).unwrap().into_owned()
}

#[tokio::test]
async fn test_default_draft_sends_deep_link() {
    let portal = TestPortal::without_advisor().await;
    let browser = customer(&portal).await;

    let resp = browser.post_form("/order/send", &[]).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let location = resp.headers()["location"].to_str().unwrap().to_string();
    let message = decoded_message(&location);

    for needle in [
        "NEW ORDER - RAVI PATEL",
        "*Customer:* Ravi Patel",
        "*Phone:* 9876543210",
        "14 Inch Thali",
        "120 GSM",
        "Green",
        "10 Bags",
        "20 pcs/pkt",
        "*Note:* None",
    ] {
        assert!(message.contains(needle), "missing {needle:?} in {message}");
    }
}

#[tokio::test]
async fn test_submitted_fields_are_applied_before_sending() {
    let portal = TestPortal::without_advisor().await;
    let browser = customer(&portal).await;

    let resp = browser
        .post_form(
            "/order/send",
            &[
                ("item", "Partition Plate"),
                ("grade", "300 GSM"),
                ("color", "Silver"),
                ("bags", "25"),
                ("pieces_per_bag", "50"),
                ("deadline", "2026-11-01"),
                ("note", "Logo on lid & rim"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let message = decoded_message(resp.headers()["location"].to_str().unwrap());

    assert!(message.contains("*Item:* Partition Plate"));
    assert!(message.contains("*Spec:* 300 GSM | Silver"));
    assert!(message.contains("*Qty:* 25 Bags (50 pcs/pkt)"));
    assert!(message.contains("*Deadline:* 2026-11-01"));
    assert!(message.contains("*Note:* Logo on lid & rim"));
}

#[tokio::test]
async fn test_draft_resets_after_send() {
    let portal = TestPortal::without_advisor().await;
    let browser = customer(&portal).await;

    browser
        .post_form("/order/send", &[("bags", "42"), ("note", "rush")])
        .await;

    let panel = browser.get_fragment("/order").await.text().await.unwrap();
    assert!(panel.contains("name=\"bags\" min=\"1\" value=\"10\""));
    assert!(!panel.contains("rush"));
}

#[tokio::test]
async fn test_out_of_stock_selection_is_blocked() {
    let portal = TestPortal::without_advisor().await;
    let browser = customer(&portal).await;

    // 200 GSM Silver starts out of stock
    let resp = browser
        .post_fragment("/order/draft", &[("grade", "200 GSM"), ("color", "Silver")])
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let panel = resp.text().await.unwrap();
    assert!(panel.contains("id=\"order-panel\""));
    assert!(panel.contains("This item is currently out of stock."));
    assert!(panel.contains("disabled"));

    let resp = browser.post_form("/order/send", &[]).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert!(resp.headers().get("location").is_none());
    let body = resp.text().await.unwrap();
    assert!(body.contains("This item is currently out of stock."));
}

#[tokio::test]
async fn test_admin_toggle_blocks_customer_in_same_browser() {
    let portal = TestPortal::without_advisor().await;
    let browser = portal.browser();
    browser.login_admin().await;
    browser
        .post_fragment(
            "/admin/inventory/toggle",
            &[("grade", "120 GSM"), ("color", "Green")],
        )
        .await;
    browser.post_form("/auth/logout", &[]).await;
    browser.login_customer("Ravi Patel", "9876543210").await;

    let resp = browser.post_form("/order/send", &[]).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_quantities_are_coerced() {
    let portal = TestPortal::without_advisor().await;
    let browser = customer(&portal).await;

    let resp = browser
        .post_fragment(
            "/order/draft",
            &[("bags", "lots"), ("pieces_per_bag", "-5")],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = browser.post_form("/order/send", &[]).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let message = decoded_message(resp.headers()["location"].to_str().unwrap());
    assert!(message.contains("*Qty:* 0 Bags (0 pcs/pkt)"), "{message}");
}

#[tokio::test]
async fn test_plain_draft_edit_redirects_home() {
    let portal = TestPortal::without_advisor().await;
    let browser = customer(&portal).await;

    let resp = browser
        .post_form("/order/draft", &[("note", "blue print")])
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(browser.page().await.contains("blue print"));
}

#[tokio::test]
async fn test_draft_rejects_unknown_color() {
    let portal = TestPortal::without_advisor().await;
    let browser = customer(&portal).await;

    let resp = browser
        .post_fragment("/order/draft", &[("color", "Purple")])
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rejected_edit_changes_nothing() {
    let portal = TestPortal::without_advisor().await;
    let browser = customer(&portal).await;

    let resp = browser
        .post_fragment(
            "/order/draft",
            &[("item", "Partition Plate"), ("grade", "999 GSM")],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let panel = browser.get_fragment("/order").await.text().await.unwrap();
    assert!(panel.contains("<option value=\"14 Inch Thali\" selected>"));
    assert!(!panel.contains("<option value=\"Partition Plate\" selected>"));
}
