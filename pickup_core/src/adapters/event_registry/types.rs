use serde::{Deserialize, Serialize};

/// Request body for `POST /api/v1/article/getArticles`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetArticlesRequest<'a> {
    pub api_key: &'a str,
    pub keyword: &'a str,
    pub date_start: String,
    pub date_end: String,
    pub result_type: &'static str,
    pub articles_page: u32,
    pub articles_count: u32,
    pub articles_sort_by: &'static str,
}

/// Either `articles` or `error` is populated; the service may report an
/// error with a 200 status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetArticlesResponse {
    #[serde(default)]
    pub articles: Option<ArticlesPage>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlesPage {
    #[serde(default)]
    pub results: Vec<EventRegistryArticle>,
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub pages: Option<u32>,
}

/// One article from the event index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRegistryArticle {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// Calendar date, e.g. `2024-03-01`
    #[serde(default)]
    pub date: Option<String>,
    /// Full timestamp, e.g. `2024-03-01T08:15:00Z`
    #[serde(default)]
    pub date_time: Option<String>,
    #[serde(default)]
    pub source: Option<EventRegistrySource>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRegistrySource {
    /// Publisher domain, e.g. `deadline.com`
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_uses_camel_case() {
        let req = GetArticlesRequest {
            api_key: "k",
            keyword: "Jane Doe Atlas",
            date_start: "2024-03-01".into(),
            date_end: "2024-03-31".into(),
            result_type: "articles",
            articles_page: 1,
            articles_count: 100,
            articles_sort_by: "date",
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["apiKey"], "k");
        assert_eq!(value["dateStart"], "2024-03-01");
        assert_eq!(value["articlesCount"], 100);
    }

    #[test]
    fn parses_results_page() {
        let body = json!({
            "articles": {
                "results": [{
                    "uri": "8012345",
                    "url": "https://deadline.com/atlas",
                    "title": "Atlas casting",
                    "date": "2024-03-01",
                    "dateTime": "2024-03-01T08:15:00Z",
                    "source": {"uri": "deadline.com", "title": "Deadline"}
                }],
                "totalResults": 1,
                "page": 1,
                "pages": 1
            }
        });
        let parsed: GetArticlesResponse = serde_json::from_value(body).unwrap();
        let page = parsed.articles.unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].date_time.as_deref(), Some("2024-03-01T08:15:00Z"));
    }

    #[test]
    fn parses_error_body() {
        let parsed: GetArticlesResponse =
            serde_json::from_value(json!({"error": "Invalid API key"})).unwrap();
        assert!(parsed.articles.is_none());
        assert_eq!(parsed.error.as_deref(), Some("Invalid API key"));
    }
}
