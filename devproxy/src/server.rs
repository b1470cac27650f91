use crate::config::{create_cors, ProxyConfig};
use crate::proxy::{ProxyHandler, Upstream};
use crate::spa::{spa_fallback, StaticDir};
use anyhow::Result;
use rocket::fs::{FileServer, Options};
use rocket::{routes, Build, Rocket};

const PY_MOUNT: &str = "/api/py";
const API_MOUNT: &str = "/api";

pub fn http_client() -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;
    Ok(client)
}

pub fn build_rocket(config: ProxyConfig) -> Result<Rocket<Build>> {
    build_rocket_with_client(config, http_client()?)
}

pub fn build_rocket_with_client(
    config: ProxyConfig,
    client: reqwest::Client,
) -> Result<Rocket<Build>> {
    let cors = create_cors(&config.frontend_origin)?;

    // /api/py must outrank /api, which would otherwise swallow it.
    let py = ProxyHandler::new(
        Upstream::new(PY_MOUNT, &config.py_upstream)?,
        1,
        config.body_limit,
    );
    let api = ProxyHandler::new(
        Upstream::new(API_MOUNT, &config.api_upstream)?,
        2,
        config.body_limit,
    );

    let rocket = rocket::build()
        .manage(client)
        .manage(StaticDir(config.static_dir.clone()))
        .mount(PY_MOUNT, py)
        .mount(API_MOUNT, api)
        .mount(
            "/",
            FileServer::new(&config.static_dir, Options::Missing | Options::Index),
        )
        .mount("/", routes![spa_fallback])
        .attach(cors);

    Ok(rocket)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket::data::ToByteUnit;
    use rocket::http::{Header, Status};
    use rocket::local::blocking::Client;
    use std::fs;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::path::PathBuf;
    use std::sync::mpsc;
    use std::thread;

    fn config(api: &str, py: &str, static_dir: PathBuf) -> ProxyConfig {
        ProxyConfig {
            api_upstream: api.to_string(),
            py_upstream: py.to_string(),
            static_dir,
            frontend_origin: "http://localhost:8080".to_string(),
            body_limit: 1.mebibytes(),
        }
    }

    fn client_for(config: ProxyConfig) -> Client {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        Client::tracked(build_rocket_with_client(config, http).unwrap()).unwrap()
    }

    fn static_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("isl-devproxy-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("index.html"), "<html>isl shell</html>").unwrap();
        fs::write(dir.join("app.js"), "console.log('isl');").unwrap();
        dir
    }

    /// Serves exactly one HTTP/1.1 exchange and reports the request it saw:
    /// request line, header lines, then the body.
    fn one_shot_upstream(reply: &'static str) -> (String, mpsc::Receiver<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let origin = format!("http://{}", listener.local_addr().unwrap());
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut seen = Vec::new();
            let mut length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let line = line.trim_end().to_string();
                if line.is_empty() {
                    break;
                }
                if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    length = value.trim().parse().unwrap();
                }
                seen.push(line);
            }
            let mut body = vec![0; length];
            reader.read_exact(&mut body).unwrap();
            seen.push(String::from_utf8(body).unwrap());

            stream.write_all(reply.as_bytes()).unwrap();
            stream.flush().unwrap();
            tx.send(seen).unwrap();
        });

        (origin, rx)
    }

    #[test]
    fn py_requests_reach_the_py_upstream_without_prefix() {
        let (origin, seen) = one_shot_upstream(
            "HTTP/1.1 201 Created\r\nContent-Type: text/plain\r\nContent-Length: 2\r\n\
             X-Upstream: py\r\nAccess-Control-Allow-Origin: *\r\nConnection: close\r\n\r\nok",
        );
        let client = client_for(config("http://127.0.0.1:9/api", &origin, static_dir("py")));

        let response = client
            .post("/api/py/generate?x=1")
            .header(Header::new("Authorization", "Bearer t0k3n"))
            .body(r#"{"sentence":"hi","emotion":"happy"}"#)
            .dispatch();

        assert_eq!(response.status(), Status::Created);
        assert_eq!(response.headers().get_one("X-Upstream"), Some("py"));
        assert_eq!(response.into_string().as_deref(), Some("ok"));

        let request = seen.recv().unwrap();
        assert_eq!(request[0], "POST /generate?x=1 HTTP/1.1");
        assert!(request.iter().any(|line| line == "authorization: Bearer t0k3n"));
        assert_eq!(
            request.last().map(String::as_str),
            Some(r#"{"sentence":"hi","emotion":"happy"}"#)
        );
    }

    #[test]
    fn api_requests_keep_the_upstream_base_path() {
        let (origin, seen) = one_shot_upstream(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 2\r\n\
             Connection: close\r\n\r\n[]",
        );
        let api = format!("{origin}/api");
        let client = client_for(config(&api, "http://127.0.0.1:9", static_dir("api")));

        let response = client.get("/api/posts").dispatch();

        assert_eq!(response.status(), Status::Ok);
        assert_eq!(response.into_string().as_deref(), Some("[]"));
        assert_eq!(seen.recv().unwrap()[0], "GET /api/posts HTTP/1.1");
    }

    #[test]
    fn unreachable_upstream_is_a_bad_gateway() {
        let client = client_for(config(
            "http://127.0.0.1:9/api",
            "http://127.0.0.1:9",
            static_dir("down"),
        ));

        let response = client.get("/api/posts").dispatch();
        assert_eq!(response.status(), Status::BadGateway);
        let body = response.into_string().unwrap_or_default();
        assert!(body.starts_with("Upstream request failed"));
    }

    #[test]
    fn client_routes_fall_back_to_the_app_shell() {
        let client = client_for(config(
            "http://127.0.0.1:9/api",
            "http://127.0.0.1:9",
            static_dir("spa"),
        ));

        let page = client.get("/dashboard/profile/u42").dispatch();
        assert_eq!(page.status(), Status::Ok);
        assert_eq!(page.into_string().as_deref(), Some("<html>isl shell</html>"));

        let asset = client.get("/app.js").dispatch();
        assert_eq!(asset.into_string().as_deref(), Some("console.log('isl');"));
    }
}
