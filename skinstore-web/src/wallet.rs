//! Wallet adapters over the providers browser extensions inject into `window`.
//!
//! Phantom exposes `window.solana` and MetaMask style wallets expose
//! `window.ethereum`. Outside the browser every lookup reports "not bound".

use async_trait::async_trait;
use js_sys::{Array, Function, Object, Promise, Reflect};
use skinstore_core::{ChainAddress, DestinationWallet, SourceWallet, WalletError};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::dom::js_error_message;

/// Look up an injected global, treating `undefined` and `null` as absent.
pub(crate) fn injected(name: &str) -> Option<JsValue> {
    if !cfg!(target_arch = "wasm32") {
        return None;
    }
    let win = web_sys::window()?;
    let value = Reflect::get(&win, &JsValue::from_str(name)).ok()?;
    (!value.is_undefined() && !value.is_null()).then_some(value)
}

fn rejected(value: &JsValue) -> WalletError {
    WalletError::Rejected(js_error_message(value))
}

/// Call the EIP-1193 `request` method on an injected provider.
async fn provider_request(provider: &JsValue, method: &str) -> Result<JsValue, WalletError> {
    let request: Function = Reflect::get(provider, &JsValue::from_str("request"))
        .map_err(|err| rejected(&err))?
        .dyn_into()
        .map_err(|_| WalletError::Unavailable("Ethereum"))?;
    let args = Object::new();
    Reflect::set(&args, &JsValue::from_str("method"), &JsValue::from_str(method))
        .map_err(|err| rejected(&err))?;
    let pending = request.call1(provider, &args).map_err(|err| rejected(&err))?;
    JsFuture::from(Promise::resolve(&pending))
        .await
        .map_err(|err| rejected(&err))
}

fn first_account(accounts: &JsValue) -> Option<String> {
    accounts
        .dyn_ref::<Array>()
        .and_then(|list| list.get(0).as_string())
        .filter(|account| !account.is_empty())
}

/// Source wallet backed by Phantom's `window.solana.publicKey`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhantomWallet;

impl SourceWallet for PhantomWallet {
    fn address(&self) -> Option<ChainAddress> {
        let provider = injected("solana")?;
        let key = Reflect::get(&provider, &JsValue::from_str("publicKey")).ok()?;
        if key.is_undefined() || key.is_null() {
            return None;
        }
        let text: String = key.dyn_ref::<Object>()?.to_string().into();
        (!text.is_empty()).then(|| ChainAddress::solana(text))
    }
}

/// Authorization produced by an Ethereum activation.
///
/// `signer` is an ethers.js signer when the page ships ethers, otherwise the
/// raw provider, and is handed to the bridge unchanged.
#[derive(Debug, Clone)]
pub struct EthereumSigner {
    pub account: String,
    pub provider: JsValue,
    pub signer: JsValue,
}

fn ethers_signer(provider: &JsValue) -> Option<JsValue> {
    let ethers = injected("ethers")?;
    let providers = Reflect::get(&ethers, &JsValue::from_str("providers")).ok()?;
    let web3: Function = Reflect::get(&providers, &JsValue::from_str("Web3Provider"))
        .ok()?
        .dyn_into()
        .ok()?;
    let wrapped = Reflect::construct(&web3, &Array::of1(provider)).ok()?;
    let get_signer: Function = Reflect::get(&wrapped, &JsValue::from_str("getSigner"))
        .ok()?
        .dyn_into()
        .ok()?;
    get_signer.call0(&wrapped).ok()
}

/// Destination wallet backed by an injected `window.ethereum` provider.
///
/// The last account seen through `eth_accounts` or an activation is cached;
/// the provider's `selectedAddress` is used until then.
#[derive(Debug, Clone, Default)]
pub struct InjectedEthereumWallet {
    account: Rc<RefCell<Option<String>>>,
}

impl InjectedEthereumWallet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wallet with a known account, used where no provider is injected.
    #[must_use]
    pub fn with_account(account: impl Into<String>) -> Self {
        Self {
            account: Rc::new(RefCell::new(Some(account.into()))),
        }
    }

    /// Re-read the connected account without prompting the user.
    #[allow(clippy::future_not_send)]
    pub async fn refresh(&self) -> Option<ChainAddress> {
        let provider = injected("ethereum")?;
        let account = match provider_request(&provider, "eth_accounts").await {
            Ok(accounts) => first_account(&accounts),
            Err(err) => {
                log::debug!("eth_accounts failed: {err}");
                None
            }
        };
        self.account.replace(account.clone());
        account.map(ChainAddress::ethereum)
    }
}

#[async_trait(?Send)]
impl DestinationWallet for InjectedEthereumWallet {
    type Authorization = EthereumSigner;

    fn address(&self) -> Option<ChainAddress> {
        if let Some(account) = self.account.borrow().clone() {
            return Some(ChainAddress::ethereum(account));
        }
        let provider = injected("ethereum")?;
        Reflect::get(&provider, &JsValue::from_str("selectedAddress"))
            .ok()?
            .as_string()
            .filter(|account| !account.is_empty())
            .map(ChainAddress::ethereum)
    }

    async fn activate(&self) -> Result<EthereumSigner, WalletError> {
        let provider = injected("ethereum").ok_or(WalletError::Unavailable("Ethereum"))?;
        let accounts = provider_request(&provider, "eth_requestAccounts").await?;
        let account = first_account(&accounts).ok_or(WalletError::NoAccount)?;
        self.account.replace(Some(account.clone()));
        let signer = ethers_signer(&provider).unwrap_or_else(|| provider.clone());
        Ok(EthereumSigner {
            account,
            provider,
            signer,
        })
    }
}
