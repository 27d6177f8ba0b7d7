//! Content materializer - turns a record id into displayable HTML / 内容渲染
//!
//! Rendering is owned by the site; this only fetches the generated record page
//! and cuts out its `<main>` element.

use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use url::Url;

use crate::error::{Result, SearchError};

static MAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<main\b[^>]*>(.*)</main>").expect("valid main element regex")
});

/// Content materializer trait / 内容渲染 trait
#[async_trait]
pub trait ContentMaterializer: Send + Sync {
    /// Render one record / 渲染单条记录
    async fn materialize(&self, id: &str) -> Result<String>;
}

/// Fetches `{site}/{id}.html` / 通过 HTTP 获取记录页面
pub struct HttpContentMaterializer {
    client: Client,
    site_url: Url,
}

impl HttpContentMaterializer {
    pub fn new(site_url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, site_url })
    }

    fn record_url(&self, id: &str) -> Result<Url> {
        self.site_url
            .join(&format!("{}.html", id))
            .map_err(|e| SearchError::Content(format!("{}: {}", id, e)))
    }
}

#[async_trait]
impl ContentMaterializer for HttpContentMaterializer {
    async fn materialize(&self, id: &str) -> Result<String> {
        let url = self.record_url(id)?;
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(SearchError::Content(format!(
                "HTTP {} for {}",
                response.status(),
                id
            )));
        }
        let page = response.text().await?;
        extract_main(&page, id)
    }
}

/// Inner HTML of `<main>`, with a permalink appended to its header
/// / 提取 main 元素并在 header 中追加固定链接
pub fn extract_main(page: &str, id: &str) -> Result<String> {
    let inner = MAIN_RE
        .captures(page)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| SearchError::Content(format!("no <main> element in {}", id)))?;

    let permalink = format!(
        r#"<span class="links"><a href="/{}.html" class="permalink"><i class="fa-solid fa-link"></i></a></span>"#,
        id
    );
    Ok(match inner.find("</header>") {
        Some(pos) => format!("{}{}{}", &inner[..pos], permalink, &inner[pos..]),
        None => inner.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body><nav>menu</nav><main class="content">
<header><h1>Hello</h1></header><p>Body</p></main></body></html>"#;

    #[test]
    fn test_extract_main_adds_permalink() {
        let html = extract_main(PAGE, "post/hello").unwrap();
        assert!(!html.contains("<nav>"));
        assert!(html.contains("<p>Body</p>"));
        assert!(html.contains(
            r#"<h1>Hello</h1><span class="links"><a href="/post/hello.html" class="permalink">"#
        ));
        assert!(html.trim_end().ends_with("<p>Body</p>"));
    }

    #[test]
    fn test_extract_main_without_header() {
        let html = extract_main("<main><p>x</p></main>", "page/x").unwrap();
        assert_eq!(html, "<p>x</p>");
    }

    #[test]
    fn test_missing_main() {
        let err = extract_main("<html></html>", "page/x").unwrap_err();
        assert!(matches!(err, SearchError::Content(_)));
    }

    #[tokio::test]
    async fn test_http_materializer() {
        let app = axum::Router::new().route(
            "/post/hello.html",
            axum::routing::get(|| async { PAGE }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let site = Url::parse(&format!("http://{}/", addr)).unwrap();
        let materializer = HttpContentMaterializer::new(site, Duration::from_secs(5)).unwrap();
        let html = materializer.materialize("post/hello").await.unwrap();
        assert!(html.contains("permalink"));

        let err = materializer.materialize("post/missing").await.unwrap_err();
        assert!(matches!(err, SearchError::Content(_)));
    }
}
