mod common;

use foodapp_storefront::{
    error::AppError,
    services::api::{ApiClient, AuthorizedClient},
    views::admin::{
        ADMIN_PAGE_SIZE, AdminPanel, AdminTab, CREATED_MESSAGE, DELETE_FAILED_MESSAGE,
        DELETED_MESSAGE, FlashKind, SAVE_FAILED_MESSAGE, UPDATED_MESSAGE,
    },
};

use common::{ADMIN_TOKEN, ALICE_TOKEN, MockApi};

fn as_admin(mock: &MockApi) -> AuthorizedClient {
    mock.client().with_token(Some(ADMIN_TOKEN.to_string()))
}

async fn loaded(api: &AuthorizedClient) -> AdminPanel {
    let mut panel = AdminPanel::new();
    panel.load(api).await;
    panel
}

fn fill_pizza(panel: &mut AdminPanel) {
    let form = panel.form_mut();
    form.name = "Pizza".to_string();
    form.description = "Cheesy".to_string();
    form.price = "9.99".to_string();
    form.stock = "10".to_string();
    form.category_id = "2".to_string();
    form.active = true;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_fetches_products_and_categories() {
        let mock = MockApi::spawn().await;
        let panel = loaded(&as_admin(&mock)).await;

        assert!(!panel.loading);
        assert_eq!(panel.products.len(), 12);
        assert_eq!(panel.categories.len(), 2);

        let sent = mock.requests_to("GET", "/api/products");
        assert!(sent[0].query.contains(&format!("size={}", ADMIN_PAGE_SIZE)));
        assert_eq!(sent[0].authorization.as_deref(), Some("Bearer admin-access"));

        let page = panel.render();
        assert_eq!(page.products_tab_label, "Products (12)");
        assert_eq!(page.categories_tab_label, "Categories (2)");
        assert_eq!(page.toggle_label, "Add Product");
        assert!(page.form.is_none());
    }

    #[tokio::test]
    async fn test_create_product_coerces_form_and_refetches() {
        let mock = MockApi::spawn().await;
        let api = as_admin(&mock);
        let mut panel = loaded(&api).await;

        // Step 1: open the form and fill it in
        panel.toggle_form();
        assert!(panel.show_form);
        assert_eq!(panel.render().form.unwrap().title, "New Product");
        fill_pizza(&mut panel);

        // Step 2: submit
        panel.submit(&api).await.unwrap();

        let sent = mock.requests_to("POST", "/api/products");
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].authorization.as_deref(), Some("Bearer admin-access"));
        let body = sent[0].json();
        assert_eq!(body["name"], "Pizza");
        assert!(body["price"].is_f64(), "Price must be sent as a number");
        assert_eq!(body["price"].as_f64(), Some(9.99));
        assert_eq!(body["stock"].as_i64(), Some(10));
        assert_eq!(body["categoryId"].as_i64(), Some(2));
        assert_eq!(body["active"], true);

        // Step 3: form closed, message shown, data refetched
        assert!(!panel.show_form);
        assert!(panel.editing.is_none());
        assert!(panel.form.name.is_empty());
        let message = panel.message.clone().unwrap();
        assert_eq!(message.text, CREATED_MESSAGE);
        assert_eq!(message.kind, FlashKind::Success);
        assert_eq!(mock.count("GET", "/api/products"), 2);
        assert_eq!(panel.products.len(), 13);
        assert!(panel.products.iter().any(|p| p.name == "Pizza"));
    }

    #[tokio::test]
    async fn test_blank_stock_is_sent_as_zero() {
        let mock = MockApi::spawn().await;
        let api = as_admin(&mock);
        let mut panel = loaded(&api).await;

        panel.toggle_form();
        fill_pizza(&mut panel);
        panel.form_mut().stock = String::new();
        panel.submit(&api).await.unwrap();

        let body = mock.requests_to("POST", "/api/products")[0].json();
        assert_eq!(body["stock"].as_i64(), Some(0));
    }

    #[tokio::test]
    async fn test_stock_keeps_leading_integer() {
        let mock = MockApi::spawn().await;
        let api = as_admin(&mock);
        let mut panel = loaded(&api).await;

        for stock in ["12.5", "12abc", " 12", "abc"] {
            if !panel.show_form {
                panel.toggle_form();
            }
            fill_pizza(&mut panel);
            panel.form_mut().stock = stock.to_string();
            panel.submit(&api).await.unwrap();
        }

        let stocks: Vec<_> = mock
            .requests_to("POST", "/api/products")
            .iter()
            .map(|r| r.json()["stock"].as_i64())
            .collect();
        assert_eq!(stocks, vec![Some(12), Some(12), Some(12), Some(0)]);
    }

    #[tokio::test]
    async fn test_edit_prefills_and_updates() {
        let mock = MockApi::spawn().await;
        let api = as_admin(&mock);
        let mut panel = loaded(&api).await;

        let product = panel.products.iter().find(|p| p.id == 3).cloned().unwrap();
        panel.edit(product);
        assert!(panel.show_form);
        assert_eq!(panel.form.name, "Dish 03");
        assert_eq!(panel.form.price, "8");
        assert_eq!(panel.form.category_id, "1");

        let form = panel.render().form.unwrap();
        assert_eq!(form.title, "Edit Product");
        assert_eq!(form.submit_label, "Update");

        panel.form_mut().price = "8.5".to_string();
        panel.submit(&api).await.unwrap();

        let sent = mock.requests_to("PUT", "/api/products/3");
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].json()["price"].as_f64(), Some(8.5));
        assert_eq!(panel.message.as_ref().unwrap().text, UPDATED_MESSAGE);
        assert_eq!(mock.count("POST", "/api/products"), 0);
    }

    #[tokio::test]
    async fn test_toggle_form_resets_edit_state() {
        let mock = MockApi::spawn().await;
        let mut panel = loaded(&as_admin(&mock)).await;

        let product = panel.products[0].clone();
        panel.edit(product);
        panel.toggle_form();
        assert!(!panel.show_form);
        assert!(panel.editing.is_none());
        assert!(panel.form.name.is_empty());
        assert!(panel.form.active, "A reset form defaults to active");
    }

    #[tokio::test]
    async fn test_server_validation_keeps_form_open() {
        let mock = MockApi::spawn().await;
        let api = as_admin(&mock);
        let mut panel = loaded(&api).await;

        panel.toggle_form();
        fill_pizza(&mut panel);
        panel.form_mut().price = "0".to_string();

        let err = panel.submit(&api).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(panel.show_form);
        let message = panel.message.clone().unwrap();
        assert_eq!(message.kind, FlashKind::Error);
        assert_eq!(message.text, "Invalid input (price: Price must be greater than 0)");
        assert_eq!(mock.count("GET", "/api/products"), 1, "No refetch after a failure");
    }

    #[tokio::test]
    async fn test_local_validation_blocks_submission() {
        let mock = MockApi::spawn().await;
        let api = as_admin(&mock);
        let mut panel = loaded(&api).await;
        panel.toggle_form();

        fill_pizza(&mut panel);
        panel.form_mut().name = "   ".to_string();
        assert!(panel.submit(&api).await.is_err());
        assert_eq!(panel.message.as_ref().unwrap().text, "Name is required");

        fill_pizza(&mut panel);
        panel.form_mut().price = "cheap".to_string();
        assert!(panel.submit(&api).await.is_err());
        assert_eq!(panel.message.as_ref().unwrap().text, "Price must be a number");

        fill_pizza(&mut panel);
        panel.form_mut().category_id = String::new();
        assert!(matches!(panel.submit(&api).await, Err(AppError::Validation(_))));

        assert_eq!(mock.count("POST", "/api/products"), 0);
    }

    #[tokio::test]
    async fn test_forbidden_shows_server_message() {
        let mock = MockApi::spawn().await;
        let api = mock.client().with_token(Some(ALICE_TOKEN.to_string()));
        let mut panel = loaded(&api).await;

        panel.toggle_form();
        fill_pizza(&mut panel);
        let err = panel.submit(&api).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(panel.message.as_ref().unwrap().text, "Access Denied");
    }

    #[tokio::test]
    async fn test_unreachable_api_shows_generic_save_error() {
        let api = ApiClient::new("http://127.0.0.1:9/api", std::time::Duration::from_secs(2))
            .unwrap()
            .with_token(Some(ADMIN_TOKEN.to_string()));
        let mut panel = AdminPanel::new();
        panel.load(&api).await;
        assert!(panel.error.is_some());

        panel.toggle_form();
        fill_pizza(&mut panel);
        assert!(panel.submit(&api).await.is_err());
        assert_eq!(panel.message.as_ref().unwrap().text, SAVE_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let mock = MockApi::spawn().await;
        let api = as_admin(&mock);
        let mut panel = loaded(&api).await;

        // Step 1: declining does nothing
        panel.request_delete(5);
        assert_eq!(panel.render().pending_delete, Some(5));
        panel.cancel_delete();
        assert!(panel.pending_delete.is_none());
        assert!(matches!(
            panel.confirm_delete(&api).await,
            Err(AppError::Validation(_))
        ));
        assert_eq!(mock.count("DELETE", "/api/products/5"), 0);

        // Step 2: confirming deletes and refetches
        panel.request_delete(5);
        panel.confirm_delete(&api).await.unwrap();
        assert_eq!(mock.count("DELETE", "/api/products/5"), 1);
        assert_eq!(panel.message.as_ref().unwrap().text, DELETED_MESSAGE);
        assert_eq!(panel.products.len(), 11);
        assert!(panel.products.iter().all(|p| p.id != 5));
    }

    #[tokio::test]
    async fn test_failed_delete_shows_generic_message() {
        let mock = MockApi::spawn().await;
        let api = as_admin(&mock);
        let mut panel = loaded(&api).await;

        panel.request_delete(999);
        assert!(panel.confirm_delete(&api).await.is_err());
        let message = panel.message.clone().unwrap();
        assert_eq!(message.text, DELETE_FAILED_MESSAGE);
        assert_eq!(message.kind, FlashKind::Error);
        assert_eq!(panel.products.len(), 12);
    }

    #[tokio::test]
    async fn test_categories_tab() {
        let mock = MockApi::spawn().await;
        let mut panel = loaded(&as_admin(&mock)).await;

        assert_eq!(AdminTab::parse(Some("categories")), AdminTab::Categories);
        assert_eq!(AdminTab::parse(Some("bogus")), AdminTab::Products);

        panel.select_tab(AdminTab::Categories);
        let page = panel.render();
        assert_eq!(page.active_tab, AdminTab::Categories);
        assert_eq!(page.category_rows[0].name, "Pizza");
        assert_eq!(page.category_rows[0].active, "Yes");
    }
}
