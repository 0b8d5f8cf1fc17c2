//! Job-posting URL extraction: fetch the page once, drop non-content
//! elements, return whitespace-collapsed visible text.

use scraper::{Html, Node};
use tracing::debug;

use super::ExtractError;

/// Sent so sites that block default HTTP clients serve the real page.
const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Elements whose entire subtree is invisible chrome, not posting content.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "nav", "header", "footer", "noscript"];

/// Fetches a job-posting URL and returns its visible text.
///
/// Single attempt, fail fast: the posting fetch is never retried. The caller
/// decides whether to ask the user for pasted text instead.
pub async fn fetch_visible_text(
    client: &reqwest::Client,
    url: &str,
) -> Result<String, ExtractError> {
    let response = client
        .get(url)
        .header(reqwest::header::USER_AGENT, DESKTOP_USER_AGENT)
        .send()
        .await
        .map_err(|e| ExtractError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ExtractError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(|e| ExtractError::Fetch {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let text = visible_text(&body);
    debug!("Fetched {} chars of visible text from {url}", text.len());
    Ok(text)
}

/// Parses HTML and returns its visible text with single-space separators.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut raw = String::new();
    collect_text(document.tree.root(), &mut raw);
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(node: ego_tree::NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Element(element) => {
            if SKIPPED_ELEMENTS.contains(&element.name()) {
                return;
            }
            for child in node.children() {
                collect_text(child, out);
            }
        }
        Node::Text(text) => {
            out.push_str(text);
            out.push(' ');
        }
        _ => {
            for child in node.children() {
                collect_text(child, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JOB_PAGE: &str = r#"<html>
      <head><title>Jobs</title><style>body { color: red; }</style></head>
      <body>
        <nav>Home | Jobs | About</nav>
        <header>MegaCorp careers</header>
        <main>
          <h1>Backend   Engineer</h1>
          <p>We need <b>Rust</b> and
             SQL experience.</p>
          <script>trackVisit();</script>
        </main>
        <footer>© MegaCorp</footer>
      </body>
    </html>"#;

    #[test]
    fn test_visible_text_drops_chrome_elements() {
        let text = visible_text(JOB_PAGE);
        assert!(!text.contains("trackVisit"));
        assert!(!text.contains("color: red"));
        assert!(!text.contains("Home | Jobs"));
        assert!(!text.contains("MegaCorp careers"));
        assert!(!text.contains("© MegaCorp"));
    }

    #[test]
    fn test_visible_text_collapses_whitespace() {
        let text = visible_text(JOB_PAGE);
        assert!(text.contains("Backend Engineer"));
        assert!(text.contains("We need Rust and SQL experience"));
    }

    #[test]
    fn test_visible_text_is_idempotent() {
        assert_eq!(visible_text(JOB_PAGE), visible_text(JOB_PAGE));
    }
}
