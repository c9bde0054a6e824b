//! HTTP application: shared state, dispatch and page assembly

use std::{
    io,
    sync::Arc,
};

use axum::{
    extract::State,
    http::{
        Method,
        Uri,
    },
    response::Response,
    Router,
};
use futures::future::try_join_all;
use tokio::net::TcpListener;
use tracing::{
    info,
    instrument,
};
use wasi_results_core::{
    render::{
        render_detail,
        render_index,
        DetailPage,
    },
    ResultStore,
    ResultsError,
    ResultsResult,
    StoreKey,
};

use crate::{
    responder,
    router::Route,
};

/// State shared by every request; immutable after startup
#[derive(Clone)]
pub struct AppState {
    store:        Arc<dyn ResultStore>,
    suite_branch: Arc<str>,
}

impl AppState {
    /// `suite_branch` is resolved to the commit whose results the index shows
    pub fn new(store: Arc<dyn ResultStore>, suite_branch: impl Into<String>) -> Self {
        Self {
            store,
            suite_branch: Arc::from(suite_branch.into()),
        }
    }

    pub fn store(&self) -> &dyn ResultStore {
        self.store.as_ref()
    }

    pub fn suite_branch(&self) -> &str {
        &self.suite_branch
    }
}

/// Router serving every path through [`dispatch`]
pub fn app(state: AppState) -> Router {
    Router::new().fallback(dispatch).with_state(state)
}

/// Serve `app` on `listener` until Ctrl-C
pub async fn serve(listener: TcpListener, state: AppState) -> io::Result<()> {
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}

#[instrument(skip_all, fields(method = %method, path = %uri.path()))]
async fn dispatch(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return responder::method_not_allowed();
    }

    let route = match Route::parse(uri.path()) {
        Ok(route) => route,
        Err(e) => return responder::error_response(&e),
    };

    match route {
        Route::Index => responder::page_or_error(index_page(&state).await),
        Route::Detail(key) => responder::page_or_error(detail_page(&state, &key).await),
        Route::Raw(key) => match state.store().fetch_raw(&key).await {
            Ok(blob) => responder::raw(blob),
            Err(e) => responder::error_response(&e),
        },
        Route::Health => responder::health(),
    }
}

/// Render the index for the head commit of the suite branch
///
/// A commit without a published result directory renders an empty index.
pub async fn index_page(state: &AppState) -> ResultsResult<String> {
    let store = state.store();
    let commit = store.resolve_commit(state.suite_branch()).await?;
    let entries = match store.list_entries(&commit).await {
        Ok(entries) => entries,
        Err(e) if e.is_not_found() => {
            info!(commit = %commit, "no results published for commit");
            Vec::new()
        },
        Err(e) => return Err(e),
    };

    // Fetch every report at once; rendering follows listing order
    let reports = try_join_all(entries.into_iter().map(|entry| async move {
        // Listed paths come from the store, so a bad one is an upstream fault
        let key = entry
            .key()
            .map_err(|e| ResultsError::upstream(entry.path.clone(), e.to_string()))?;
        let report = store.fetch_report(&key).await?;
        Ok::<_, ResultsError>((entry, report))
    }))
    .await?;

    info!(commit = %commit, reports = reports.len(), "rendered index");
    Ok(render_index(&reports))
}

/// Render the detail page of one report
pub async fn detail_page(state: &AppState, key: &StoreKey) -> ResultsResult<String> {
    let report = state.store().fetch_report(key).await?;
    let commit = key.commit();
    let commit_url = commit.and_then(|commit| state.store().commit_url(commit));
    let page = DetailPage::new(&report).with_commit(commit, commit_url.as_deref());
    Ok(render_detail(&page))
}
