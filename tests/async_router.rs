use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::Poll;

use futures_util::FutureExt;
use http::{Method, StatusCode};
use switchyard::{
    AsyncRouter, BoxError, BoxedAsyncHandler, Eventual, HandlerRef, Request, Response,
    ResponseFuture, RouteDefinition, RouteError, RouteHandler, Routes,
};
use tokio::sync::oneshot;

async fn foo(req: Request) -> Result<Response, BoxError> {
    Ok(Response::text(format!("foo:{}", req.route_name().unwrap_or("-"))))
}

async fn fails(_req: Request) -> Result<Response, BoxError> {
    Err("handler exploded".into())
}

fn table() -> Routes<BoxedAsyncHandler> {
    Routes::new()
        .route("foo", RouteDefinition::new([Method::GET], "/", HandlerRef::direct(foo)))
        .route("fails", RouteDefinition::new([Method::GET], "/fails", HandlerRef::direct(fails)))
}

fn get(path: &str) -> Request {
    Request::new(Method::GET, path)
}

#[tokio::test]
async fn dispatch_resolves_to_handler_response() {
    let router = AsyncRouter::new(table()).unwrap();

    let res = router.dispatch(get("/"), Response::new()).await.unwrap();

    assert_eq!(res.body().as_ref(), b"foo:foo");
}

#[tokio::test]
async fn dispatch_without_next_returns_fallback_future() {
    let router = AsyncRouter::new(table()).unwrap();

    let res = router.dispatch(get("/missing"), Response::new()).await.unwrap();
    assert_eq!(res.status_code(), StatusCode::NOT_FOUND);

    let res = router.dispatch(Request::new(Method::PUT, "/"), Response::new()).await.unwrap();
    assert_eq!(res.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(res.header("allow"), Some("GET"));
}

#[tokio::test]
async fn next_runs_once_and_only_after_handler_settles() {
    let (release, gate) = oneshot::channel::<()>();
    let gate = Arc::new(std::sync::Mutex::new(Some(gate)));

    let waiting = move |_req: Request| {
        let gate = gate.lock().unwrap().take();
        async move {
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            Ok::<_, BoxError>(Response::text("R"))
        }
    };
    let routes: Routes<BoxedAsyncHandler> = Routes::new()
        .route("slow", RouteDefinition::new([Method::GET], "/slow", HandlerRef::direct(waiting)));
    let router = AsyncRouter::new(routes).unwrap();

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut fut = router.dispatch_then(get("/slow"), Response::new(), move |req, res| {
        counter.fetch_add(1, Ordering::SeqCst);
        assert_eq!(req.route_name(), Some("slow"));
        assert_eq!(res.body().as_ref(), b"R");
        Response::text("R2")
    });

    // Nothing has settled yet, so `next` must not have run.
    assert!(matches!(futures_util::poll!(&mut fut), Poll::Pending));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    release.send(()).unwrap();
    let res = fut.await.unwrap();

    assert_eq!(res.body().as_ref(), b"R2");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn next_sees_original_request_after_fallback() {
    let router = AsyncRouter::new(table()).unwrap();

    let res = router
        .dispatch_then(get("/missing"), Response::new(), |req, res| {
            assert_eq!(req.path(), "/missing");
            assert_eq!(req.route_name(), None);
            res.with_status(StatusCode::GONE)
        })
        .await
        .unwrap();

    assert_eq!(res.status_code(), StatusCode::GONE);
}

#[tokio::test]
async fn rejection_propagates_and_skips_next() {
    let router = AsyncRouter::new(table()).unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let err = router
        .dispatch_then(get("/fails"), Response::new(), move |_, res| {
            counter.fetch_add(1, Ordering::SeqCst);
            res
        })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "handler exploded");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn resolution_failure_still_yields_a_future() {
    let router = AsyncRouter::new(table()).unwrap();

    // Resolution is synchronous; the fallback future is ready on first poll.
    let fut: ResponseFuture = router.dispatch(get("/missing"), Response::new());
    let res = fut.now_or_never().expect("fallback future is immediately ready").unwrap();

    assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn handle_request_returns_errors_before_any_future() {
    let router = AsyncRouter::new(table()).unwrap();

    assert!(matches!(router.handle_request(get("/nope")), Err(RouteError::NotFound(_))));

    let Ok(fut) = router.handle_request(get("/")) else { panic!("expected a route") };
    assert_eq!(fut.await.unwrap().body().as_ref(), b"foo:foo");
}

struct Teapot;

impl RouteHandler<Eventual> for Teapot {
    fn handle_not_found(&self, _req: Request, res: Response) -> ResponseFuture {
        async move {
            tokio::task::yield_now().await;
            Ok::<_, BoxError>(res.with_status(StatusCode::IM_A_TEAPOT))
        }
        .boxed()
    }
}

#[tokio::test]
async fn custom_async_fallback_is_awaited() {
    let router = AsyncRouter::builder(table()).route_handler(Teapot).build().unwrap();

    let res = router
        .dispatch_then(get("/missing"), Response::new(), |_, res| res)
        .await
        .unwrap();

    assert_eq!(res.status_code(), StatusCode::IM_A_TEAPOT);
}

#[tokio::test]
async fn router_serves_concurrent_tasks() {
    let routes: Routes<BoxedAsyncHandler> = Routes::new().route(
        "echo",
        RouteDefinition::new([Method::GET], "/echo/{word}", HandlerRef::direct(|req: Request| async move {
            Ok::<_, BoxError>(req.param("word").unwrap_or_default().to_owned())
        })),
    );
    let router = Arc::new(AsyncRouter::new(routes).unwrap());

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let router = Arc::clone(&router);
            tokio::spawn(async move {
                let res = router.dispatch(get(&format!("/echo/w{i}")), Response::new()).await.unwrap();
                assert_eq!(res.body().as_ref(), format!("w{i}").as_bytes());
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap();
    }
}
