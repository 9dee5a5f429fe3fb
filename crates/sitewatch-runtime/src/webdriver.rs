use crate::driver::SessionDriver;
use crate::{Error, Result};
use serde_json::{Value, json};
use std::time::{Duration, Instant};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
const FORM_WAIT: Duration = Duration::from_secs(10);
const FORM_POLL_INTERVAL: Duration = Duration::from_millis(250);

const ACCOUNT_SELECTOR: &str = "input[formcontrolname='account']";

const FILL_LOGIN_FORM: &str = r#"
const account = document.querySelector("input[formcontrolname='account']");
const password = document.querySelector("input[formcontrolname='password']");
const button = document.querySelector("button");
if (!account || !password || !button) { return false; }
account.value = arguments[0];
account.dispatchEvent(new Event('input', { bubbles: true }));
password.value = arguments[1];
password.dispatchEvent(new Event('input', { bubbles: true }));
button.click();
return true;
"#;

/// Browser session over the WebDriver REST protocol.
///
/// Created against a chromedriver/Selenium endpoint with performance logging
/// enabled, so the devtools network log is drainable through the log
/// endpoint. The drain is destructive on the server side: every call returns
/// only entries accumulated since the previous call.
pub struct WebDriverSession {
    http: reqwest::blocking::Client,
    base: String,
    session_id: Option<String>,
}

impl WebDriverSession {
    /// Create a new browser session and maximize its window.
    pub fn connect(endpoint: &str, headless: bool) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()?;

        let mut args: Vec<&str> = vec!["--disable-gpu"];
        if headless {
            args.push("--headless=new");
        }

        let capabilities = json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:loggingPrefs": { "performance": "ALL" },
                    "goog:chromeOptions": { "args": args },
                }
            }
        });

        let mut session = Self {
            http,
            base: endpoint.trim_end_matches('/').to_string(),
            session_id: None,
        };

        let value = session.post("session", &capabilities)?;
        let id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Session("webdriver returned no session id".to_string()))?;
        session.session_id = Some(id.to_string());

        // Best effort; a non-resizable environment is not fatal
        let _ = session.session_post("window/maximize", &json!({}));

        Ok(session)
    }

    fn session_id(&self) -> Result<&str> {
        self.session_id
            .as_deref()
            .ok_or_else(|| Error::Session("session already closed".to_string()))
    }

    fn post(&self, path: &str, body: &Value) -> Result<Value> {
        let response = self
            .http
            .post(format!("{}/{}", self.base, path))
            .json(body)
            .send()?;
        unwrap_value(response)
    }

    fn session_post(&self, path: &str, body: &Value) -> Result<Value> {
        let id = self.session_id()?;
        self.post(&format!("session/{}/{}", id, path), body)
    }

    fn session_get(&self, path: &str) -> Result<Value> {
        let id = self.session_id()?;
        let response = self
            .http
            .get(format!("{}/session/{}/{}", self.base, id, path))
            .send()?;
        unwrap_value(response)
    }

    fn execute(&self, script: &str, args: Value) -> Result<Value> {
        self.session_post("execute/sync", &json!({ "script": script, "args": args }))
    }
}

impl SessionDriver for WebDriverSession {
    fn navigate(&mut self, url: &str) -> Result<()> {
        self.session_post("url", &json!({ "url": url }))?;
        Ok(())
    }

    fn current_location(&mut self) -> Result<String> {
        let value = self.session_get("url")?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::Session("webdriver returned a non-string URL".to_string()))
    }

    fn drain_network_log(&mut self) -> Result<Vec<String>> {
        let value = self.session_post("se/log", &json!({ "type": "performance" }))?;
        let entries = value
            .as_array()
            .ok_or_else(|| Error::Session("webdriver returned a non-array log".to_string()))?;
        Ok(entries.iter().map(Value::to_string).collect())
    }

    fn document_ready(&mut self) -> Result<bool> {
        let value = self.execute(
            "return document.readyState === 'complete' && document.body !== null;",
            json!([]),
        )?;
        Ok(value.as_bool().unwrap_or(false))
    }

    fn submit_credentials(&mut self, account: &str, password: &str) -> Result<()> {
        // The login form renders asynchronously; wait for it first
        let probe = format!("return document.querySelector(\"{}\") !== null;", ACCOUNT_SELECTOR);
        let deadline = Instant::now() + FORM_WAIT;
        loop {
            if self.execute(&probe, json!([]))?.as_bool().unwrap_or(false) {
                break;
            }
            if Instant::now() >= deadline {
                return Err(Error::Session("login form never appeared".to_string()));
            }
            std::thread::sleep(FORM_POLL_INTERVAL);
        }

        let filled = self.execute(FILL_LOGIN_FORM, json!([account, password]))?;
        if !filled.as_bool().unwrap_or(false) {
            return Err(Error::Session("login form is missing expected fields".to_string()));
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let Some(id) = self.session_id.take() else {
            return Ok(());
        };
        self.http
            .delete(format!("{}/session/{}", self.base, id))
            .send()?;
        Ok(())
    }
}

impl Drop for WebDriverSession {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

/// Unwrap the W3C `{"value": ...}` envelope, surfacing protocol errors.
fn unwrap_value(response: reqwest::blocking::Response) -> Result<Value> {
    let status = response.status();
    let body: Value = response.json()?;
    let value = body.get("value").cloned().unwrap_or(Value::Null);

    if !status.is_success() {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown webdriver error");
        return Err(Error::Session(format!("webdriver request failed: {}", message)));
    }

    Ok(value)
}
