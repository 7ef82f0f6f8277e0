use anyhow::anyhow;
use asset_tracker_exchange::client::{
    AccountClientKind, AccountClientRequest, AccountClientResponse,
};
use bon::{bon, Builder};
use std::time::Duration;
use tokio::time::{sleep, Sleep};
use tower::{
    retry::Policy, util::BoxCloneService, BoxError, Service, ServiceBuilder, ServiceExt,
};

pub type AccountClientSvc = BoxCloneService<AccountClientRequest, AccountClientResponse, BoxError>;

#[derive(Debug, Clone)]
pub struct Attempts {
    max_retries: u64,
    wait_secs: Option<u64>,
}

#[bon]
impl Attempts {
    #[builder]
    pub fn new(max_retries: u64, wait_secs: Option<u64>) -> Self {
        Attempts {
            max_retries,
            wait_secs,
        }
    }
}

impl<Req, Res, E> Policy<Req, Res, E> for Attempts
where
    Req: Clone,
{
    type Future = Sleep;

    fn retry(&mut self, _req: &mut Req, result: &mut Result<Res, E>) -> Option<Self::Future> {
        match result {
            Ok(_) => None,
            Err(_) => {
                if self.max_retries > 0 {
                    self.max_retries -= 1;

                    let wait = Duration::from_secs(self.wait_secs.unwrap_or(0));

                    Some(sleep(wait))
                } else {
                    None
                }
            }
        }
    }

    fn clone_request(&mut self, req: &Req) -> Option<Req> {
        Some(req.clone())
    }
}

/// 单次交易所请求的超时与重试
#[derive(Builder, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientServiceConfig {
    #[builder(default = 10)]
    pub timeout_secs: u64,
    #[builder(default = 1)]
    pub retry_max_retries: u64,
    #[builder(default = 1)]
    pub retry_wait_secs: u64,
}

impl Default for ClientServiceConfig {
    fn default() -> Self {
        ClientServiceConfig::builder().build()
    }
}

#[allow(async_fn_in_trait)]
pub trait AccountClientService {
    fn account_client_svc(
        &self,
        client: &AccountClientKind,
        config: &ClientServiceConfig,
    ) -> AccountClientSvc {
        let svc = client.clone();
        let retry_policy = Attempts::builder()
            .max_retries(config.retry_max_retries)
            .wait_secs(config.retry_wait_secs)
            .build();
        let timeout = Duration::from_secs(config.timeout_secs);

        ServiceBuilder::new()
            .retry(retry_policy)
            .timeout(timeout)
            .service(svc)
            .boxed_clone()
    }

    async fn account_client_svc_call(
        &self,
        svc: &mut AccountClientSvc,
        req: AccountClientRequest,
    ) -> anyhow::Result<AccountClientResponse> {
        let res = svc
            .ready()
            .await
            .map_err(|e| anyhow!(e))?
            .call(req)
            .await
            .map_err(|e| anyhow!(e))?;

        Ok(res)
    }
}
