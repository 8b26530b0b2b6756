use crate::{
    bot::{Error, Result},
    context::Context,
};

use async_trait::async_trait;
use tokio::task::{self, JoinError};

use std::{
    fmt::{self, Debug, Formatter},
    future::Future,
    sync::Arc,
};

/// The function behind a command.
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    async fn call(&self, ctx: Context) -> Result;
}

struct FnHandler<F>(F);

#[async_trait]
impl<F, Fut> Handler for FnHandler<F>
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result> + Send + 'static,
{
    async fn call(&self, ctx: Context) -> Result {
        (self.0)(ctx).await
    }
}

/// Runs a [`Handler`] on its own task so a panicking handler cannot take the
/// caller down with it.
#[derive(Clone)]
pub struct Executor {
    handler: Arc<dyn Handler>,
}

impl Executor {
    pub fn new<H>(handler: H) -> Self
    where
        H: Handler,
    {
        Self {
            handler: Arc::new(handler),
        }
    }

    pub fn from_fn<F, Fut>(f: F) -> Self
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result> + Send + 'static,
    {
        Self::new(FnHandler(f))
    }

    pub async fn send(&self, ctx: Context) -> Result {
        let handler = self.handler.clone();

        match task::spawn(async move { handler.call(ctx).await }).await {
            Ok(res) => res,
            Err(err) => Err(Error::Panicked(panic_message(err))),
        }
    }
}

impl Debug for Executor {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Executor").finish_non_exhaustive()
    }
}

fn panic_message(err: JoinError) -> String {
    if !err.is_panic() {
        return String::from("handler task was cancelled");
    }

    let payload = err.into_panic();
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        String::from("unknown panic payload")
    }
}
