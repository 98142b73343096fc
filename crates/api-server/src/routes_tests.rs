#[cfg(test)]
mod tests {
    use super::super::*;
    use analysis_core::{
        AnalysisError, Bar, ChatMessage, ChatProvider, CompanyOverview, OverviewProvider, QuoteProvider,
    };
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use chrono::{Duration, NaiveDate};
    use forecast_engine::{FeatureWindow, PriceModel};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct FakeQuotes {
        closes: Vec<f64>,
    }

    #[async_trait]
    impl QuoteProvider for FakeQuotes {
        async fn daily_bars(&self, symbol: &str, _from: NaiveDate, _to: NaiveDate) -> Result<Vec<Bar>, AnalysisError> {
            match symbol {
                "DOWN" => Err(AnalysisError::Upstream("connection reset".to_string())),
                "NONE" => Ok(Vec::new()),
                "SHORT" => Ok(bars(&self.closes[..30])),
                _ => Ok(bars(&self.closes)),
            }
        }
    }

    struct FakeOverviews;

    #[async_trait]
    impl OverviewProvider for FakeOverviews {
        async fn company_overview(&self, symbol: &str) -> Result<CompanyOverview, AnalysisError> {
            if symbol != "AAPL" {
                return Err(AnalysisError::NoData(format!("No company overview for {}", symbol)));
            }
            Ok(CompanyOverview {
                symbol: "AAPL".to_string(),
                name: "Apple Inc".to_string(),
                sector: "TECHNOLOGY".to_string(),
                industry: "ELECTRONIC COMPUTERS".to_string(),
                country: "USA".to_string(),
                description: "Consumer electronics".to_string(),
                market_cap: "3020.00B".to_string(),
                dividend_yield: "0.44%".to_string(),
                week52_high: "$260.10".to_string(),
                week52_low: "$164.08".to_string(),
                currency: "USD".to_string(),
                exchange: "NASDAQ".to_string(),
            })
        }
    }

    struct CannedChat;

    #[async_trait]
    impl ChatProvider for CannedChat {
        async fn complete(&self, messages: &[ChatMessage]) -> Result<String, AnalysisError> {
            Ok(format!("You asked: {}", messages[1].content))
        }
    }

    struct MidpointModel;

    impl PriceModel for MidpointModel {
        fn name(&self) -> &'static str {
            "Midpoint"
        }

        fn fit_predict(&self, _train: &[FeatureWindow], test: &[FeatureWindow]) -> Result<Vec<f64>, AnalysisError> {
            Ok(vec![0.5; test.len()])
        }
    }

    fn bars(closes: &[f64]) -> Vec<Bar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                date: start + Duration::days(i as i64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 2_500_000.0,
            })
            .collect()
    }

    fn test_app() -> Router {
        let closes: Vec<f64> = (0..150).map(|i| 100.0 + (i as f64 * 0.2).sin() * 4.0).collect();
        let models: Vec<Box<dyn PriceModel>> = vec![Box::new(MidpointModel)];
        let pipeline = AnalysisPipeline::new(
            TechnicalAnalysisEngine::new(),
            ForecastEngine::with_models(ForecastConfig::default(), models),
        );
        let orchestrator = StockInsightOrchestrator::new(
            Arc::new(FakeQuotes { closes }),
            Arc::new(FakeOverviews),
            Arc::new(CannedChat),
        )
        .with_pipeline(pipeline);

        app(AppState {
            orchestrator: Arc::new(orchestrator),
        })
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = test_app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_overview_found() {
        let (status, body) = send(get("/api/stocks/aapl/overview")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["name"], "Apple Inc");
        assert!(body["error"].is_null());
    }

    #[tokio::test]
    async fn test_overview_missing_is_404() {
        let (status, body) = send(get("/api/stocks/ZZZZ/overview")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("ZZZZ"));
    }

    #[tokio::test]
    async fn test_symbol_with_url_characters_is_400() {
        // %3F decodes to '?' in the path parameter
        let (status, body) = send(get("/api/stocks/A%3Fb/overview")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);

        let (status, _) = send(get("/api/stocks/A%2F..%2FX/analysis")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_analysis_report() {
        let (status, body) = send(get("/api/stocks/msft/analysis")).await;
        assert_eq!(status, StatusCode::OK);

        let report = &body["data"];
        assert_eq!(report["symbol"], "MSFT");
        assert_eq!(report["indicators"].as_array().unwrap().len(), 150);
        assert_eq!(report["forecast"]["forecasts"][0]["model_name"], "Midpoint");
        assert!(report["signal"]["interpretation"].as_array().unwrap().len() == 2);
        assert!(report["forecast_interpretation"].as_str().unwrap().contains("1 models"));
    }

    #[tokio::test]
    async fn test_analysis_error_statuses() {
        let (status, _) = send(get("/api/stocks/SHORT/analysis")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = send(get("/api/stocks/NONE/analysis")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(get("/api/stocks/DOWN/analysis")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].as_str().unwrap().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_quick_prompts() {
        let (status, body) = send(get("/api/chat/prompts")).await;
        assert_eq!(status, StatusCode::OK);

        let prompts = body["data"].as_array().unwrap();
        assert_eq!(prompts.len(), 5);
        assert_eq!(prompts[0]["title"], "Technical Analysis");
    }

    #[tokio::test]
    async fn test_chat_extends_history() {
        let request = post_json(
            "/api/chat/aapl",
            json!({
                "history": [
                    {"role": "user", "content": "Hi"},
                    {"role": "assistant", "content": "Hello"}
                ],
                "message": "Is it a buy?"
            }),
        );

        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);

        let history = body["data"]["history"].as_array().unwrap();
        assert_eq!(history.len(), 4);
        assert_eq!(history[2]["role"], "user");
        assert_eq!(history[2]["content"], "Is it a buy?");
        assert_eq!(history[3]["role"], "assistant");
        assert_eq!(history[3]["content"], "You asked: Is it a buy?");
    }

    #[tokio::test]
    async fn test_chat_blank_message_is_400() {
        let (status, body) = send(post_json("/api/chat/AAPL", json!({ "message": "   " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (AnalysisError::InsufficientData(String::new()), StatusCode::UNPROCESSABLE_ENTITY),
            (AnalysisError::InvalidData(String::new()), StatusCode::BAD_REQUEST),
            (AnalysisError::NoData(String::new()), StatusCode::NOT_FOUND),
            (AnalysisError::Upstream(String::new()), StatusCode::BAD_GATEWAY),
            (AnalysisError::Model(String::new()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, expected) in cases {
            assert_eq!(AppError::from(error).status(), expected);
        }
    }
}
