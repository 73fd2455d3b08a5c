mod common;

use binance_guard::exchanges::binance::MarketType;
use binance_guard::{ApiRoot, ExchangeError, HttpMethod};
use common::{client, signed_request_error, MockRest};
use rust_decimal::Decimal;
use serde_json::{json, Value};

const RECV_WINDOW_BODY: &str =
    r#"{"code":-1021,"msg":"Timestamp for this request is outside of the recvWindow."}"#;

fn local_now() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod time_tests {
    use super::*;

    #[tokio::test]
    async fn test_time_passes_valid_record_through() {
        let mock = MockRest::new();
        mock.reply(json!({"serverTime": 1_499_827_319_559_i64}));

        let time = client(&mock).time(&[]).await;
        assert_eq!(time.server_time, 1_499_827_319_559);

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].root, ApiRoot::Api);
        assert_eq!(calls[0].endpoint, "v3/time");
        assert_eq!(calls[0].method, HttpMethod::Get);
        assert!(!calls[0].signed);
    }

    #[tokio::test]
    async fn test_time_wraps_bare_number() {
        let mock = MockRest::new();
        mock.reply(json!(1_499_827_319_559_i64));

        assert_eq!(client(&mock).time(&[]).await.server_time, 1_499_827_319_559);
    }

    #[tokio::test]
    async fn test_time_falls_back_on_null_and_false() {
        for reply in [Value::Null, json!(false)] {
            let mock = MockRest::new();
            mock.reply(reply);

            let before = local_now();
            let time = client(&mock).time(&[]).await;
            assert!(time.server_time >= before);
            assert!(time.server_time <= local_now());
        }
    }

    #[tokio::test]
    async fn test_time_falls_back_when_field_missing() {
        let mock = MockRest::new();
        mock.reply(json!({"time": 5}));

        let before = local_now();
        assert!(client(&mock).time(&[]).await.server_time >= before);
    }

    #[tokio::test]
    async fn test_time_falls_back_on_failure() {
        let mock = MockRest::new();
        mock.fail(ExchangeError::NetworkError(
            "Could not resolve host: api.binance.com".to_string(),
        ));

        let before = local_now();
        assert!(client(&mock).time(&[]).await.server_time >= before);
    }
}

#[cfg(test)]
mod open_orders_tests {
    use super::*;

    #[tokio::test]
    async fn test_open_orders_returns_list_unchanged() {
        let orders = json!([
            {"symbol": "BTCUSDT", "orderId": 1, "status": "NEW"},
            {"symbol": "BTCUSDT", "orderId": 2, "status": "PARTIALLY_FILLED"}
        ]);
        let mock = MockRest::new();
        mock.reply(orders.clone());

        let result = client(&mock).open_orders(Some("BTCUSDT"), &[]).await;
        assert_eq!(Value::Array(result), orders);

        let call = &mock.calls()[0];
        assert_eq!(call.endpoint, "v3/openOrders");
        assert_eq!(call.params["symbol"], "BTCUSDT");
        assert!(call.signed);
    }

    #[tokio::test]
    async fn test_open_orders_without_symbol_sends_no_symbol() {
        let mock = MockRest::new();
        mock.reply(json!([]));

        assert!(client(&mock).open_orders(None, &[]).await.is_empty());
        assert!(!mock.calls()[0].params.contains_key("symbol"));
    }

    #[tokio::test]
    async fn test_open_orders_null_or_false_is_empty() {
        for reply in [Value::Null, json!(false)] {
            let mock = MockRest::new();
            mock.reply(reply);
            assert!(client(&mock).open_orders(None, &[]).await.is_empty());
        }
    }

    #[tokio::test]
    async fn test_open_orders_non_list_is_empty() {
        let mock = MockRest::new();
        mock.reply(json!({"code": -1003, "msg": "Too many requests"}));

        assert!(client(&mock).open_orders(None, &[]).await.is_empty());
    }

    #[tokio::test]
    async fn test_open_orders_failure_is_empty() {
        let mock = MockRest::new();
        mock.fail(signed_request_error(r#"{"code":-2015,"msg":"Invalid API-key"}"#));

        assert!(client(&mock).open_orders(None, &[]).await.is_empty());
    }
}

#[cfg(test)]
mod balances_tests {
    use super::*;

    #[tokio::test]
    async fn test_spot_balances_decoded() {
        let mock = MockRest::new();
        mock.reply(json!({
            "makerCommission": 15,
            "balances": [
                {"asset": "BTC", "free": "0.5", "locked": "0.1"},
                {"asset": "USDT", "free": "100.00", "locked": "0.00"}
            ]
        }));

        let balances = client(&mock)
            .balances(MarketType::Spot, &[("recvWindow", "5000")], None)
            .await
            .unwrap();

        assert_eq!(balances.len(), 2);
        assert_eq!(balances["BTC"].available, Decimal::new(5, 1));
        assert_eq!(balances["BTC"].on_order, Decimal::new(1, 1));
        assert_eq!(balances["USDT"].total(), Decimal::from(100));

        let call = &mock.calls()[0];
        assert_eq!(call.root, ApiRoot::Api);
        assert_eq!(call.endpoint, "v3/account");
        assert_eq!(call.params["recvWindow"], "5000");
        assert!(call.signed);
    }

    #[tokio::test]
    async fn test_futures_balances_route_to_fapi() {
        let mock = MockRest::new();
        mock.reply(json!([
            {"asset": "USDT", "balance": "50.0", "availableBalance": "45.0"}
        ]));

        let balances = client(&mock)
            .balances(MarketType::Futures, &[], None)
            .await
            .unwrap();

        assert_eq!(balances["USDT"].on_order, Decimal::from(5));
        let call = &mock.calls()[0];
        assert_eq!(call.root, ApiRoot::Fapi);
        assert_eq!(call.endpoint, "v2/balance");
    }

    #[tokio::test]
    async fn test_api_version_is_honoured() {
        let mock = MockRest::new();
        mock.reply(json!({"balances": []}));

        client(&mock)
            .balances(MarketType::Spot, &[], Some("v1"))
            .await
            .unwrap();
        assert_eq!(mock.calls()[0].endpoint, "v1/account");
    }

    #[tokio::test]
    async fn test_timestamp_failure_yields_empty_balances() {
        let mock = MockRest::new();
        mock.fail(signed_request_error(RECV_WINDOW_BODY));

        let balances = client(&mock)
            .balances(MarketType::Spot, &[], None)
            .await
            .unwrap();
        assert!(balances.is_empty());
    }

    #[tokio::test]
    async fn test_other_failures_propagate_unchanged() {
        let mock = MockRest::new();
        mock.fail(signed_request_error(r#"{"code":-2015,"msg":"Invalid API-key"}"#));

        let err = client(&mock)
            .balances(MarketType::Spot, &[], None)
            .await
            .unwrap_err();

        match err {
            ExchangeError::SignedRequest(body) => {
                assert_eq!(body, r#"{"code":-2015,"msg":"Invalid API-key"}"#);
            }
            other => panic!("expected the original error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_network_failure_propagates() {
        let mock = MockRest::new();
        mock.fail(ExchangeError::NetworkError("Connection timed out".to_string()));

        assert!(matches!(
            client(&mock).balances(MarketType::Spot, &[], None).await,
            Err(ExchangeError::NetworkError(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_reply_yields_empty_balances() {
        let mock = MockRest::new();
        mock.reply(Value::Null);

        assert!(client(&mock)
            .balances(MarketType::Spot, &[], None)
            .await
            .unwrap()
            .is_empty());
    }
}
