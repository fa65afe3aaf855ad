//! Cross-chain settlement through the page's Wormhole integration script.

use async_trait::async_trait;
use futures::future::LocalBoxFuture;
use js_sys::{Array, BigInt, Function, Promise, Reflect};
use skinstore_core::{SettlementError, SettlementOutcome, SettlementRequest, SettlementService, Timer};
use std::time::Duration;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::dom::js_error_message;
use crate::wallet::{EthereumSigner, injected};

/// Global the integration script installs on `window`.
pub const INTEGRATION_GLOBAL: &str = "wormholeIntegration";
/// Method invoked for every purchase.
pub const PURCHASE_METHOD: &str = "purchaseSkinWithCrossChainPayment";

/// Settlement service calling
/// `window.wormholeIntegration.purchaseSkinWithCrossChainPayment`.
///
/// The amount crosses as a `BigInt` of token base units. The call resolves to
/// either a `{ success }` object or a bare flag, see [`settled_successfully`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WormholeBridge;

impl WormholeBridge {
    fn method() -> Result<(JsValue, Function), SettlementError> {
        let integration = injected(INTEGRATION_GLOBAL).ok_or_else(|| {
            SettlementError::Unavailable(format!("window.{INTEGRATION_GLOBAL} is not loaded"))
        })?;
        let method = Reflect::get(&integration, &JsValue::from_str(PURCHASE_METHOD))
            .ok()
            .and_then(|value| value.dyn_into::<Function>().ok())
            .ok_or_else(|| {
                SettlementError::Unavailable(format!("{INTEGRATION_GLOBAL}.{PURCHASE_METHOD} is missing"))
            })?;
        Ok((integration, method))
    }
}

#[async_trait(?Send)]
impl SettlementService for WormholeBridge {
    type Authorization = EthereumSigner;

    async fn purchase(
        &self,
        request: SettlementRequest<EthereumSigner>,
    ) -> Result<SettlementOutcome, SettlementError> {
        let (integration, method) = Self::method()?;
        let args = Array::of5(
            &BigInt::from(request.amount.base_units()).into(),
            &JsValue::from_str(&request.buyer_address),
            &JsValue::from_str(&request.recipient_address),
            &request.authorization.signer,
            &JsValue::from_str(&request.token_contract_address),
        );
        let failed = |err: JsValue| SettlementError::Failed(js_error_message(&err));
        let pending = method.apply(&integration, &args).map_err(failed)?;
        let settled = JsFuture::from(Promise::resolve(&pending))
            .await
            .map_err(failed)?;
        log::debug!("bridge resolved with {settled:?}");
        Ok(SettlementOutcome {
            success: settled_successfully(&settled),
        })
    }
}

/// Read the success flag out of whatever the integration resolved with.
///
/// Objects report through their `success` property; any other value is judged
/// by JavaScript truthiness.
#[must_use]
pub fn settled_successfully(settled: &JsValue) -> bool {
    if settled.is_object() {
        return Reflect::get(settled, &JsValue::from_str("success"))
            .is_ok_and(|flag| flag.is_truthy());
    }
    settled.is_truthy()
}

/// Timer backed by `window.setTimeout`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTimer;

impl Timer for BrowserTimer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        let ms = i32::try_from(duration.as_millis()).unwrap_or(i32::MAX);
        Box::pin(async move {
            if let Err(err) = crate::dom::sleep_ms(ms).await {
                log::warn!("settlement timer failed: {}", js_error_message(&err));
                futures::future::pending::<()>().await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skinstore_core::FixedPointAmount;

    #[test]
    fn missing_integration_is_unavailable() {
        let request = SettlementRequest {
            amount: FixedPointAmount::from_base_units(500_000),
            buyer_address: "0xbuyer".to_string(),
            recipient_address: "So1recipient".to_string(),
            authorization: EthereumSigner {
                account: "0xbuyer".to_string(),
                provider: JsValue::NULL,
                signer: JsValue::NULL,
            },
            token_contract_address: String::new(),
        };
        let result = futures::executor::block_on(WormholeBridge.purchase(request));
        assert!(matches!(result, Err(SettlementError::Unavailable(_))));
    }
}
