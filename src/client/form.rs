//! Login form discovery and filling

use crate::config::Credentials;
use scraper::{Html, Selector};
use url::Url;

/// Id of the login form on the portal's login page
pub const LOGIN_FORM_ID: &str = "form-login";

/// Name of the login form's identifier field
pub const EMAIL_FIELD: &str = "email";

/// Name of the login form's secret field
pub const PASSWORD_FIELD: &str = "password";

/// HTTP method a form submits with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMethod {
    Get,
    Post,
}

/// A form extracted from a page, ready to be filled and submitted
#[derive(Debug, Clone)]
pub struct LoginForm {
    /// Absolute submission URL
    pub action: Url,

    pub method: FormMethod,

    /// Every named control in document order with its current value
    pub fields: Vec<(String, String)>,
}

impl LoginForm {
    /// Locates the form with id `form_id` in `html`
    ///
    /// The action is resolved against `page_url`; a missing or empty action
    /// submits back to the page itself. Checkboxes and radios contribute
    /// only when checked. A select contributes its selected options, or its
    /// first option when none is selected. The first named submit control
    /// is treated as the submitter; other buttons never contribute.
    ///
    /// Returns `None` when the page has no such form.
    pub fn parse(html: &str, form_id: &str, page_url: &Url) -> Option<Self> {
        let document = Html::parse_document(html);
        let form_selector = Selector::parse(&format!("form[id=\"{}\"]", form_id)).ok()?;
        let control_selector =
            Selector::parse("input[name], textarea[name], select[name], button[name]").ok()?;
        let option_selector = Selector::parse("option").ok()?;

        let form = document.select(&form_selector).next()?;

        let action = form
            .value()
            .attr("action")
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .and_then(|a| page_url.join(a).ok())
            .unwrap_or_else(|| page_url.clone());

        let method = match form.value().attr("method") {
            Some(m) if m.eq_ignore_ascii_case("get") => FormMethod::Get,
            _ => FormMethod::Post,
        };

        let mut fields = Vec::new();
        let mut submitter_seen = false;
        for control in form.select(&control_selector) {
            let element = control.value();
            let Some(name) = element.attr("name") else {
                continue;
            };
            if element.attr("disabled").is_some() {
                continue;
            }

            match element.name() {
                "textarea" => {
                    fields.push((name.to_string(), control.text().collect()));
                }
                "select" => {
                    let options: Vec<_> = control.select(&option_selector).collect();
                    let mut selected: Vec<_> = options
                        .iter()
                        .filter(|o| o.value().attr("selected").is_some())
                        .collect();
                    if element.attr("multiple").is_none() {
                        selected.truncate(1);
                        if selected.is_empty() {
                            selected.extend(options.first());
                        }
                    }
                    for option in selected {
                        let value = option
                            .value()
                            .attr("value")
                            .map(str::to_string)
                            .unwrap_or_else(|| option.text().collect::<String>().trim().to_string());
                        fields.push((name.to_string(), value));
                    }
                }
                "button" => {
                    let kind = element.attr("type").unwrap_or("submit");
                    if kind.eq_ignore_ascii_case("submit") && !submitter_seen {
                        submitter_seen = true;
                        fields.push((name.to_string(), element.attr("value").unwrap_or("").to_string()));
                    }
                }
                _ => {
                    let kind = element.attr("type").unwrap_or("text").to_ascii_lowercase();
                    match kind.as_str() {
                        "submit" if !submitter_seen => {
                            submitter_seen = true;
                            fields.push((name.to_string(), element.attr("value").unwrap_or("").to_string()))
                        }
                        "submit" | "button" | "image" | "reset" | "file" => continue,
                        "checkbox" | "radio" if element.attr("checked").is_none() => continue,
                        "checkbox" | "radio" => {
                            fields.push((name.to_string(), element.attr("value").unwrap_or("on").to_string()))
                        }
                        _ => fields.push((name.to_string(), element.attr("value").unwrap_or("").to_string())),
                    }
                }
            }
        }

        Some(Self {
            action,
            method,
            fields,
        })
    }

    /// Returns true if the form has a control called `name`
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|(field, _)| field == name)
    }

    /// Sets the value of every control called `name`
    ///
    /// Returns false if the form has no such control.
    pub fn set_field(&mut self, name: &str, value: &str) -> bool {
        let mut found = false;
        for (field, current) in self.fields.iter_mut() {
            if field == name {
                *current = value.to_string();
                found = true;
            }
        }
        found
    }

    /// Fills the identifier and secret fields
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Both fields were present and filled
    /// * `Err(&str)` - Name of the first field the form lacks
    pub fn fill(&mut self, credentials: &Credentials) -> Result<(), &'static str> {
        if !self.set_field(EMAIL_FIELD, &credentials.email) {
            return Err(EMAIL_FIELD);
        }
        if !self.set_field(PASSWORD_FIELD, &credentials.password) {
            return Err(PASSWORD_FIELD);
        }
        Ok(())
    }
}
