use actix_web::{delete, get, post, put, web, HttpResponse};
use domain_certification::command::{CreateOrderCommand, UpdateOrderCommand};
use domain_certification::model::vo::CreatedOrder;

use crate::api::dtos::{ConflictResponse, ListOrdersQuery, ListResponse, PagedResponse};
use crate::api::{extract_uuid, ApiError, ApiResult};
use crate::infrastructure::ServiceProvider;

#[get("/pedidos")]
pub async fn list(
    sp: web::Data<ServiceProvider>,
    query: web::Query<ListOrdersQuery>,
) -> ApiResult<HttpResponse> {
    let query = query.into_inner();
    let paged = query.is_paged();
    let (limit, offset) = (query.limit, query.offset.unwrap_or(0));

    let page = sp.order_service().list(query.into()).await?;
    Ok(if paged {
        HttpResponse::Ok().json(PagedResponse {
            count: page.orders.len(),
            total: page.total,
            limit,
            offset,
            data: page.orders,
        })
    } else {
        HttpResponse::Ok().json(ListResponse::from(page.orders))
    })
}

#[get("/pedidos/{uuid}")]
pub async fn find(
    sp: web::Data<ServiceProvider>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let uuid = extract_uuid(&path.into_inner())?;
    let order = sp.order_service().get(uuid).await?;
    Ok(HttpResponse::Ok().json(order))
}

#[post("/pedidos")]
pub async fn create(
    sp: web::Data<ServiceProvider>,
    body: web::Json<CreateOrderCommand>,
) -> ApiResult<HttpResponse> {
    let cmd = body.into_inner();
    if cmd.nome_completo.trim().is_empty() {
        return Err(ApiError::bad_request("nome_completo must not be blank".to_string()));
    }
    Ok(match sp.order_service().create(cmd).await? {
        CreatedOrder::Approved { order } => HttpResponse::Created().json(order),
        CreatedOrder::Conflicted { order, existing } => {
            HttpResponse::Conflict().json(ConflictResponse {
                code: "conflict",
                message: format!("OAB {} already has an order", order.numero_oab),
                data: order,
                existing,
            })
        }
    })
}

#[put("/pedidos/{uuid}")]
pub async fn update(
    sp: web::Data<ServiceProvider>,
    path: web::Path<String>,
    body: web::Json<UpdateOrderCommand>,
) -> ApiResult<HttpResponse> {
    let uuid = extract_uuid(&path.into_inner())?;
    let order = sp.order_service().update(uuid, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(order))
}

#[delete("/pedidos/{uuid}")]
pub async fn remove(
    sp: web::Data<ServiceProvider>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let uuid = extract_uuid(&path.into_inner())?;
    sp.order_service().delete(uuid).await?;
    Ok(HttpResponse::NoContent().finish())
}
