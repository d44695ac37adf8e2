use anyhow::Result;
use reqwest::blocking::Client;
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://export.arxiv.org";

const USER_AGENT: &str = "scribe-agent/1.0 (research pipeline)";

/// Academic paper search against the arXiv Atom API.
///
/// Pure query function: one best-effort call, no retries, no caching.
/// Failures never escape as errors; they come back as a single
/// `{"error": ...}` record so the model can react to them.
pub struct ArxivSearch {
    client: Client,
    base_url: String,
}

impl ArxivSearch {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point at a different host, used by tests with a local server.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Search for papers matching `query`, at most `max_results` of
    /// them, in upstream relevance order.
    pub fn search(&self, query: &str, max_results: u64) -> Vec<Value> {
        let url = format!(
            "{}/api/query?search_query=all:{}&start=0&max_results={}",
            self.base_url,
            urlencoding::encode(query),
            max_results
        );

        let body = match self
            .client
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
        {
            Ok(body) => body,
            Err(e) => return vec![json!({"error": e.to_string()})],
        };

        let mut records = parse_atom_feed(&body);
        // a lone error record stays intact; the cap applies to papers
        if records.first().and_then(|r| r.get("error")).is_none() {
            records.truncate(max_results as usize);
        }
        records
    }
}

/// Extract paper records from an arXiv Atom feed. A body that is not an
/// Atom feed, or a feed whose entries yield no records, is a parse
/// failure and comes back as a single error record; a feed with no
/// entries is a legitimate empty result.
fn parse_atom_feed(xml: &str) -> Vec<Value> {
    if !xml.contains("<feed") {
        return vec![json!({"error": "Parsing failed: not an Atom feed"})];
    }

    let entries: Vec<&str> = xml.split("<entry>").skip(1).collect();
    let mut papers = Vec::new();

    for &entry in &entries {
        let title = extract_tag(entry, "title")
            .map(|t| xml_decode(&collapse_whitespace(t)))
            .unwrap_or_default();
        let summary = extract_tag(entry, "summary")
            .map(|s| xml_decode(&collapse_whitespace(s)))
            .unwrap_or_default();
        let url = extract_tag(entry, "id").unwrap_or_default().to_string();
        // date-only precision
        let published: String = extract_tag(entry, "published")
            .unwrap_or_default()
            .chars()
            .take(10)
            .collect();

        let authors: Vec<String> = entry
            .split("<author>")
            .skip(1)
            .filter_map(|a| extract_tag(a, "name"))
            .map(|n| xml_decode(n.trim()))
            .collect();

        let link_pdf = extract_pdf_link(entry);

        if !title.is_empty() {
            papers.push(json!({
                "title": title,
                "authors": authors,
                "published": published,
                "url": url,
                "summary": summary,
                "link_pdf": link_pdf,
            }));
        }
    }

    if papers.is_empty() && !entries.is_empty() {
        return vec![json!({"error": "Parsing failed: no readable entries in feed"})];
    }

    papers
}

/// The href of the `<link title="pdf" ...>` element, when upstream
/// exposes one.
fn extract_pdf_link(entry: &str) -> Option<String> {
    for link in entry.split("<link ").skip(1) {
        let tag = link.split('>').next().unwrap_or("");
        if tag.contains("title=\"pdf\"") {
            return extract_attr(tag, "href").map(String::from);
        }
    }
    None
}

fn extract_tag<'a>(chunk: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{}", tag);
    let close = format!("</{}>", tag);
    let after_open = chunk.split(&open).nth(1)?;
    // skip attributes, if any, up to the closing '>'
    let body = after_open.split_once('>')?.1;
    body.split(&close).next().map(str::trim)
}

fn extract_attr<'a>(tag: &'a str, attr: &str) -> Option<&'a str> {
    let marker = format!("{}=\"", attr);
    tag.split(&marker).nth(1)?.split('"').next()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn xml_decode(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ATOM_FIXTURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="html">ArXiv Query: search_query=all:linear algebra</title>
  <entry>
    <id>http://arxiv.org/abs/1111.0001v1</id>
    <published>2011-11-01T12:00:00Z</published>
    <title>Randomized  Methods in
      Linear Algebra</title>
    <summary>  We survey randomized algorithms
      for matrix computations.  </summary>
    <author><name>A. Author</name></author>
    <author><name>B. Coauthor</name></author>
    <link href="http://arxiv.org/abs/1111.0001v1" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/1111.0001v1" rel="related" type="application/pdf"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/1111.0002v1</id>
    <published>2012-01-15T09:30:00Z</published>
    <title>Linear Algebra &amp; Geometry</title>
    <summary>Notes.</summary>
    <author><name>C. Writer</name></author>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_atom_feed() {
        let papers = parse_atom_feed(ATOM_FIXTURE);

        assert_eq!(papers.len(), 2);
        assert_eq!(papers[0]["title"], "Randomized Methods in Linear Algebra");
        assert_eq!(papers[0]["authors"][0], "A. Author");
        assert_eq!(papers[0]["authors"][1], "B. Coauthor");
        assert_eq!(papers[0]["published"], "2011-11-01");
        assert_eq!(papers[0]["url"], "http://arxiv.org/abs/1111.0001v1");
        assert_eq!(papers[0]["link_pdf"], "http://arxiv.org/pdf/1111.0001v1");
        assert_eq!(
            papers[0]["summary"],
            "We survey randomized algorithms for matrix computations."
        );

        assert_eq!(papers[1]["title"], "Linear Algebra & Geometry");
        assert_eq!(papers[1]["link_pdf"], Value::Null);
    }

    #[test]
    fn test_parse_empty_feed() {
        let papers = parse_atom_feed("<feed><title>no matches</title></feed>");
        assert!(papers.is_empty());
    }

    #[test]
    fn test_non_atom_body_is_a_parse_failure() {
        let papers = parse_atom_feed("<html><body>Are you a robot?</body></html>");

        assert_eq!(papers.len(), 1);
        assert!(papers[0]["error"]
            .as_str()
            .unwrap()
            .starts_with("Parsing failed"));
    }

    #[test]
    fn test_unreadable_entries_are_a_parse_failure() {
        let papers = parse_atom_feed("<feed><entry><id>only-an-id</id></entry></feed>");

        assert_eq!(papers.len(), 1);
        assert!(papers[0]["error"]
            .as_str()
            .unwrap()
            .starts_with("Parsing failed"));
    }

    #[test]
    fn test_non_atom_response_yields_error_record() -> Result<()> {
        let mut server = mockito::Server::new();
        server
            .mock(
                "GET",
                mockito::Matcher::Regex("/api/query.*".to_string()),
            )
            .with_status(200)
            .with_body("<html><body>Service temporarily unavailable</body></html>")
            .create();

        let search = ArxivSearch::with_base_url(server.url())?;
        let papers = search.search("linear algebra", 3);

        assert_eq!(papers.len(), 1);
        assert!(papers[0].get("error").is_some());
        Ok(())
    }

    #[test]
    fn test_cap_is_enforced_locally() -> Result<()> {
        let mut server = mockito::Server::new();
        server
            .mock(
                "GET",
                mockito::Matcher::Regex("/api/query.*".to_string()),
            )
            .with_status(200)
            .with_body(ATOM_FIXTURE)
            .create();

        let search = ArxivSearch::with_base_url(server.url())?;
        // the fixture carries two entries regardless of the requested cap
        let papers = search.search("linear algebra", 1);

        assert_eq!(papers.len(), 1);
        assert_eq!(papers[0]["title"], "Randomized Methods in Linear Algebra");
        Ok(())
    }

    #[test]
    fn test_search_against_local_server() -> Result<()> {
        let mut server = mockito::Server::new();
        let mock = server
            .mock(
                "GET",
                "/api/query?search_query=all:linear%20algebra&start=0&max_results=3",
            )
            .with_status(200)
            .with_body(ATOM_FIXTURE)
            .create();

        let search = ArxivSearch::with_base_url(server.url())?;
        let papers = search.search("linear algebra", 3);

        mock.assert();
        assert!(papers.len() <= 3);
        for paper in &papers {
            assert!(paper.get("title").is_some() || paper.get("error").is_some());
        }
        Ok(())
    }

    #[test]
    fn test_transport_failure_becomes_error_record() -> Result<()> {
        let mut server = mockito::Server::new();
        server
            .mock(
                "GET",
                mockito::Matcher::Regex("/api/query.*".to_string()),
            )
            .with_status(503)
            .create();

        let search = ArxivSearch::with_base_url(server.url())?;
        let papers = search.search("anything", 5);

        assert_eq!(papers.len(), 1);
        assert!(papers[0].get("error").is_some());
        Ok(())
    }
}
