use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mount an HTML body at a path on the given mock server
pub async fn mount_html(server: &MockServer, url_path: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(url_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(html.to_string().into_bytes(), "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

/// Mount a body claiming to be a PDF at a path
pub async fn mount_pdf(server: &MockServer, url_path: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(url_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(body.to_vec())
                .insert_header("content-type", "application/pdf"),
        )
        .mount(server)
        .await;
}

/// Mount a catch-all returning the given error status
pub async fn mount_error(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}
