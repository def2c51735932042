use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::api::dtos::{CreateTicketRequest, ListResponse, RenameTicketRequest};
use crate::api::{ApiError, ApiResult};
use crate::infrastructure::ServiceProvider;

#[get("/tickets")]
pub async fn list(sp: web::Data<ServiceProvider>) -> ApiResult<HttpResponse> {
    let tickets = sp.ticket_service().list().await?;
    Ok(HttpResponse::Ok().json(ListResponse::from(tickets)))
}

#[get("/tickets/{ticket}")]
pub async fn find(
    sp: web::Data<ServiceProvider>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let ticket = sp.ticket_service().get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ticket))
}

#[post("/tickets")]
pub async fn create(
    sp: web::Data<ServiceProvider>,
    body: web::Json<CreateTicketRequest>,
) -> ApiResult<HttpResponse> {
    let value = body.into_inner().ticket;
    if value.trim().is_empty() {
        return Err(ApiError::bad_request("ticket must not be blank".to_string()));
    }
    let created = sp.ticket_service().create(&value).await?;
    Ok(HttpResponse::Created().json(created))
}

#[put("/tickets/{ticket}")]
pub async fn rename(
    sp: web::Data<ServiceProvider>,
    path: web::Path<String>,
    body: web::Json<RenameTicketRequest>,
) -> ApiResult<HttpResponse> {
    let new_value = body.into_inner().ticket;
    if new_value.trim().is_empty() {
        return Err(ApiError::bad_request("ticket must not be blank".to_string()));
    }
    let renamed = sp.ticket_service().rename(&path.into_inner(), &new_value).await?;
    Ok(HttpResponse::Ok().json(renamed))
}

#[delete("/tickets/{ticket}")]
pub async fn remove(
    sp: web::Data<ServiceProvider>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    sp.ticket_service().delete(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
