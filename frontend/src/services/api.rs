use async_trait::async_trait;
use engine::AutoSaveTransport;
use gloo::net::http::Request;
use shared::{AutoSaveRequest, AutoSaveResponse, LotteryOption, LotteryResultResponse, ResultSubmissionResponse};
use web_sys::UrlSearchParams;

/// API client for communicating with the backend server
#[derive(Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient {
    /// Create a new API client with the default base URL
    pub fn new() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
        }
    }

    /// Create a new API client with a custom base URL
    pub fn with_base_url(base_url: String) -> Self {
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Lotteries offered in the draw information dropdown
    pub async fn get_lotteries(&self) -> Result<Vec<LotteryOption>, String> {
        let url = format!("{}/api/lotteries", self.base_url);

        match Request::get(&url).send().await {
            Ok(response) => match response.json::<Vec<LotteryOption>>().await {
                Ok(data) => Ok(data),
                Err(e) => Err(format!("Failed to parse lotteries: {}", e)),
            },
            Err(e) => Err(format!("Failed to fetch lotteries: {}", e)),
        }
    }

    /// Load a persisted result for editing
    pub async fn get_result(&self, result_id: i64) -> Result<LotteryResultResponse, String> {
        let url = format!("{}/api/results/{}", self.base_url, result_id);

        match Request::get(&url).send().await {
            Ok(response) => {
                if response.ok() {
                    response
                        .json::<LotteryResultResponse>()
                        .await
                        .map_err(|e| format!("Failed to parse result: {}", e))
                } else {
                    Err(format!("Result {} could not be loaded ({})", result_id, response.status()))
                }
            }
            Err(e) => Err(format!("Failed to fetch result: {}", e)),
        }
    }

    /// Persist a single ticket slot of a grouped tier
    pub async fn auto_save(&self, request: &AutoSaveRequest) -> Result<AutoSaveResponse, String> {
        let url = format!("{}/api/results/auto-save", self.base_url);

        match Request::post(&url)
            .json(request)
            .map_err(|e| format!("Failed to serialize request: {}", e))?
            .send()
            .await
        {
            Ok(response) => {
                if response.ok() {
                    match response.json::<AutoSaveResponse>().await {
                        Ok(data) => Ok(data),
                        Err(e) => Err(format!("Failed to parse response: {}", e)),
                    }
                } else {
                    let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
                    Err(error_text)
                }
            }
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }

    /// Post the whole form as repeated url-encoded fields
    pub async fn submit_result(&self, fields: &[(String, String)]) -> Result<ResultSubmissionResponse, String> {
        let url = format!("{}/api/results", self.base_url);
        let params = UrlSearchParams::new().map_err(|_| "Failed to encode form".to_string())?;
        for (name, value) in fields {
            params.append(name, value);
        }
        let body: String = params.to_string().into();

        match Request::post(&url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .map_err(|e| format!("Failed to build request: {}", e))?
            .send()
            .await
        {
            Ok(response) => {
                if response.ok() {
                    match response.json::<ResultSubmissionResponse>().await {
                        Ok(data) => Ok(data),
                        Err(e) => Err(format!("Failed to parse response: {}", e)),
                    }
                } else {
                    let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
                    Err(error_text)
                }
            }
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }
}

#[async_trait(?Send)]
impl AutoSaveTransport for ApiClient {
    async fn send(&self, request: &AutoSaveRequest) -> Result<AutoSaveResponse, String> {
        self.auto_save(request).await
    }
}
