use std::sync::Arc;

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::FormRejection;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use crate::data::catalog::read_catalog;
use crate::data::reservation::{reserve, ReservationError};
use crate::server::pages;
use crate::server::AppState;

pub const INDEX_ERROR_MESSAGE: &str = "Ocorreu um erro ao carregar a página inicial.";
pub const RESERVATION_ERROR_MESSAGE: &str = "Ocorreu um erro ao processar a reserva.";

#[derive(Debug, Deserialize)]
pub struct ReservationForm {
    pub aluno: String,
    pub livro: String,
}

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error(transparent)]
    UrlEncoded(#[from] FormRejection),
    #[error(transparent)]
    MultipartRejection(#[from] MultipartRejection),
    #[error(transparent)]
    Multipart(#[from] MultipartError),
    #[error("missing form field '{0}'")]
    MissingField(&'static str),
}

impl ReservationForm {
    /// Accepts both `application/x-www-form-urlencoded` and `multipart/form-data` bodies.
    pub async fn read(request: Request) -> Result<Self, FormError> {
        let is_multipart = request
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));
        if !is_multipart {
            let Form(form) = Form::<ReservationForm>::from_request(request, &()).await?;
            return Ok(form);
        }

        let mut multipart = Multipart::from_request(request, &()).await?;
        let (mut aluno, mut livro) = (None, None);
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_owned);
            match name.as_deref() {
                Some("aluno") if aluno.is_none() => aluno = Some(field.text().await?),
                Some("livro") if livro.is_none() => livro = Some(field.text().await?),
                _ => {}
            }
        }
        Ok(ReservationForm {
            aluno: aluno.ok_or(FormError::MissingField("aluno"))?,
            livro: livro.ok_or(FormError::MissingField("livro"))?,
        })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/reservar", post(reserve_book))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index(State(state): State<Arc<AppState>>) -> Response {
    let catalog_path = state.config.catalog_path.clone();
    match tokio::task::spawn_blocking(move || read_catalog(&catalog_path)).await {
        Ok(books) => {
            debug!(count = books.len(), "rendering catalog");
            if books.is_empty() {
                warn!("no books found");
            }
            Html(pages::index_page(&books)).into_response()
        }
        Err(err) => {
            error!(error = %err, "failed to render index page");
            internal_error(INDEX_ERROR_MESSAGE)
        }
    }
}

async fn reserve_book(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let form = match ReservationForm::read(request).await {
        Ok(form) => form,
        Err(err) => {
            error!(error = %err, "failed to read reservation form");
            return internal_error(RESERVATION_ERROR_MESSAGE);
        }
    };

    let outcome = tokio::task::spawn_blocking(move || {
        reserve(
            &state.config.catalog_path,
            &state.config.reservations_path,
            &form.aluno,
            &form.livro,
        )
    })
    .await;

    match outcome {
        Ok(Ok(_)) | Ok(Err(ReservationError::BookNotFound(_))) => Redirect::to("/").into_response(),
        Ok(Err(err)) => {
            error!(error = %err, "failed to process reservation");
            internal_error(RESERVATION_ERROR_MESSAGE)
        }
        Err(err) => {
            error!(error = %err, "reservation task failed");
            internal_error(RESERVATION_ERROR_MESSAGE)
        }
    }
}

fn internal_error(message: &'static str) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
}
