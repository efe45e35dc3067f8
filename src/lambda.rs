//! Serverless entry point: answers every HTTP trigger with the train report.

use std::sync::Arc;

use lambda_http::{service_fn, Body, Error, Request, Response};
use tracing::{debug, error};

use crate::trains::report::{CONTENT_TYPE, REPLY_HEADER, REPLY_HEADER_VALUE};
use crate::trains::{StatusSource, TrainChecker};

/// Handle a single invocation. The request itself carries nothing of interest.
pub async fn handle<S>(checker: &TrainChecker<S>, event: Request) -> Result<Response<Body>, Error>
where
    S: StatusSource + Sync,
{
    debug!(method = %event.method(), uri = %event.uri(), "Invocation received");

    let report = checker.run().await;

    let response = match report.to_json() {
        Ok(body) => Response::builder()
            .status(200)
            .header("content-type", CONTENT_TYPE)
            .header(REPLY_HEADER, REPLY_HEADER_VALUE)
            .body(Body::from(body)),
        Err(e) => {
            error!(error = %e, "Failed to serialize train status report");
            Response::builder().status(500).body(Body::Empty)
        }
    }
    .map_err(Box::new)?;

    Ok(response)
}

/// Run the Lambda runtime loop until the runtime shuts the function down.
pub async fn run<S>(checker: TrainChecker<S>) -> Result<(), Error>
where
    S: StatusSource + Send + Sync + 'static,
{
    let checker = Arc::new(checker);

    lambda_http::run(service_fn(move |event: Request| {
        let checker = Arc::clone(&checker);
        async move { handle(&*checker, event).await }
    }))
    .await
}
