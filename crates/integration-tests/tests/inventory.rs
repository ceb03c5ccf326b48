//! Admin stock toggles and the live inventory board.

use reqwest::StatusCode;
use rmp_portal_integration_tests::TestPortal;

fn toggle_form<'a>(grade: &'a str, color: &'a str) -> [(&'static str, &'a str); 2] {
    [("grade", grade), ("color", color)]
}

#[tokio::test]
async fn test_default_board_marks_200_silver_out_of_stock() {
    let portal = TestPortal::without_advisor().await;
    let admin = portal.browser();
    admin.login_admin().await;

    let resp = admin.get_fragment("/inventory").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("id=\"inventory-board\""));
    assert_eq!(body.matches("Out of Stock").count(), 1);
    assert_eq!(body.matches(">Available<").count(), 5);
}

#[tokio::test]
async fn test_toggle_returns_admin_section_fragment() {
    let portal = TestPortal::without_advisor().await;
    let admin = portal.browser();
    admin.login_admin().await;

    let resp = admin
        .post_fragment("/admin/inventory/toggle", &toggle_form("120 GSM", "Green"))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("id=\"admin-section\""));
    assert!(!body.contains("<html"));
    assert_eq!(body.matches("Out of Stock").count(), 2);

    // Flipping again restores it
    admin
        .post_fragment("/admin/inventory/toggle", &toggle_form("120 GSM", "Green"))
        .await;
    let board = admin.get_fragment("/inventory").await.text().await.unwrap();
    assert_eq!(board.matches("Out of Stock").count(), 1);
}

#[tokio::test]
async fn test_plain_toggle_redirects_home() {
    let portal = TestPortal::without_advisor().await;
    let admin = portal.browser();
    admin.login_admin().await;

    let resp = admin
        .post_form("/admin/inventory/toggle", &toggle_form("300 GSM", "silver"))
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/");

    let body = admin.page().await;
    assert_eq!(body.matches("Out of Stock").count(), 2);
}

#[tokio::test]
async fn test_toggle_rejects_unknown_grade_and_color() {
    let portal = TestPortal::without_advisor().await;
    let admin = portal.browser();
    admin.login_admin().await;

    let resp = admin
        .post_fragment("/admin/inventory/toggle", &toggle_form("999 GSM", "Green"))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = admin
        .post_fragment("/admin/inventory/toggle", &toggle_form("120 GSM", "Blue"))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Nothing changed
    let board = admin.get_fragment("/inventory").await.text().await.unwrap();
    assert_eq!(board.matches("Out of Stock").count(), 1);
}

#[tokio::test]
async fn test_inventory_survives_relogin_in_same_browser() {
    let portal = TestPortal::without_advisor().await;
    let browser = portal.browser();
    browser.login_admin().await;
    browser
        .post_fragment("/admin/inventory/toggle", &toggle_form("120 GSM", "Green"))
        .await;
    browser.post_form("/auth/logout", &[]).await;

    browser.login_customer("Ravi Patel", "9876543210").await;
    let body = browser.page().await;
    assert_eq!(body.matches("Out of Stock").count(), 2);
    assert!(body.contains("This item is currently out of stock."));
}

#[tokio::test]
async fn test_browsers_do_not_share_inventory() {
    let portal = TestPortal::without_advisor().await;

    let admin = portal.browser();
    admin.login_admin().await;
    admin
        .post_fragment("/admin/inventory/toggle", &toggle_form("120 GSM", "Green"))
        .await;

    let customer = portal.browser();
    customer.login_customer("Ravi Patel", "9876543210").await;
    let board = customer.get_fragment("/inventory").await.text().await.unwrap();
    assert_eq!(board.matches("Out of Stock").count(), 1);
}
