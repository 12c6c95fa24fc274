#[cfg(not(target_arch = "wasm32"))]
mod native {
    extern crate ripple;

    use actix_web::{web, App, HttpServer, HttpRequest, HttpResponse};

    mod adapter {
        use actix_web::HttpRequest;
        use spin_sdk::http::{Request, Response, Method};

        pub fn actix_to_spin_request(
            req: &HttpRequest,
            body: actix_web::web::Bytes,
        ) -> anyhow::Result<Request> {
            let method = match req.method().as_str() {
                "GET" => Method::Get,
                "POST" => Method::Post,
                "PUT" => Method::Put,
                "DELETE" => Method::Delete,
                "HEAD" => Method::Head,
                "OPTIONS" => Method::Options,
                "PATCH" => Method::Patch,
                _ => Method::Get,
            };

            let uri = req.uri().to_string();
            let body_vec = body.to_vec();

            let mut req_builder = Request::builder();
            let method_set = req_builder.method(method);
            let uri_set = method_set.uri(&uri);

            // Copy headers
            let mut with_headers = uri_set;
            for (name, value) in req.headers() {
                if let Ok(val_str) = value.to_str() {
                    with_headers = with_headers.header(name.as_str(), val_str);
                }
            }

            Ok(with_headers.body(body_vec).build())
        }

        pub fn spin_to_actix_response(spin_resp: Response) -> actix_web::HttpResponse {
            let status = *spin_resp.status();

            let mut response = actix_web::HttpResponse::build(
                actix_web::http::StatusCode::from_u16(status)
                    .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR),
            );

            for (name, value) in spin_resp.headers() {
                if let Some(val_str) = value.as_str() {
                    response.insert_header((name.to_string(), val_str.to_string()));
                }
            }

            response.body(spin_resp.body().to_vec())
        }
    }

    pub async fn run() -> std::io::Result<()> {
        let addr = ripple::config::listen_addr();
        tracing::info!(%addr, "server listening");

        HttpServer::new(|| {
            App::new()
                .default_service(web::route().to(handle_all))
        })
        .bind(addr)?
        .run()
        .await
    }

    async fn handle_all(req: HttpRequest, body: web::Bytes) -> HttpResponse {
        let spin_req = match adapter::actix_to_spin_request(&req, body) {
            Ok(r) => r,
            Err(_) => {
                return HttpResponse::BadRequest()
                    .json(serde_json::json!({"message": "Invalid request"}))
            }
        };

        adapter::spin_to_actix_response(ripple::route(spin_req))
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    native::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {}
