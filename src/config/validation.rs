use crate::config::types::{Config, ExpectedPage, Validations};
use crate::ConfigError;

const VALID_LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Validates the entire configuration
///
/// Every violation is collected before returning, so a broken configuration
/// file reports all of its problems in one pass rather than one per run.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    let mut collected_errors = Vec::new();

    validate_log_level(&config.log_level, &mut collected_errors);
    validate_sitemap_urls(&config.sitemap_urls, &mut collected_errors);
    validate_user_agent(&config.user_agent_for_requests, &mut collected_errors);
    validate_delay(
        config.delay_between_requests_in_seconds,
        &mut collected_errors,
    );
    validate_results_folder(&config.results_folder, &mut collected_errors);
    validate_max_fetches(config.max_sitemap_fetches, &mut collected_errors);

    if let Some(validations) = &config.validations {
        validate_expectations(validations, &mut collected_errors);
    }

    if collected_errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(collected_errors.join("\n")))
    }
}

fn validate_log_level(log_level: &str, collected_errors: &mut Vec<String>) {
    if !VALID_LOG_LEVELS.contains(&log_level) {
        collected_errors.push(format!(
            "Logging level in config key log_level={} is invalid, it must be one of {}",
            log_level,
            VALID_LOG_LEVELS.join(",")
        ));
    }
}

fn validate_sitemap_urls(urls: &[String], collected_errors: &mut Vec<String>) {
    validate_url_references(urls, collected_errors, "sitemap_urls");
}

fn validate_user_agent(user_agent: &str, collected_errors: &mut Vec<String>) {
    if user_agent.trim().is_empty() {
        collected_errors.push(format!(
            "User agent in config key user_agent_for_requests={} is invalid, \
             it must contain a non blank string",
            user_agent
        ));
    }
}

fn validate_delay(delay: f64, collected_errors: &mut Vec<String>) {
    if !delay.is_finite() || delay < 0.0 {
        collected_errors.push(format!(
            "Delay in config key delay_between_requests_in_seconds={} is invalid, \
             it must be a non-negative number of seconds",
            delay
        ));
    }
}

fn validate_results_folder(results_folder: &str, collected_errors: &mut Vec<String>) {
    if results_folder.trim().is_empty() {
        collected_errors.push(
            "Results folder in config key results_folder is invalid, it must not be blank"
                .to_string(),
        );
    }
}

fn validate_max_fetches(max_fetches: Option<u64>, collected_errors: &mut Vec<String>) {
    if max_fetches == Some(0) {
        collected_errors.push(
            "Bound in config key max_sitemap_fetches=0 is invalid, it must be at least 1"
                .to_string(),
        );
    }
}

fn validate_expectations(validations: &Validations, collected_errors: &mut Vec<String>) {
    validate_url_references(
        &validations.expected_sitemap_urls,
        collected_errors,
        "expected_sitemap_urls",
    );

    for page in &validations.expected_pages {
        validate_expected_page(page, collected_errors);
    }
}

fn validate_expected_page(page: &ExpectedPage, collected_errors: &mut Vec<String>) {
    if page.url.trim().is_empty() {
        collected_errors.push(
            "Url in key expected_pages is invalid, it must not be blank".to_string(),
        );
    }

    if let Some(priority) = &page.priority {
        match priority.parse::<f64>() {
            Ok(value) if (0.0..=1.0).contains(&value) => {}
            _ => collected_errors.push(format!(
                "Priority in key expected_pages url={} priority={} is invalid, \
                 it must be a number between 0.0 and 1.0",
                page.url, priority
            )),
        }
    }
}

fn validate_url_references(
    urls_to_validate: &[String],
    collected_errors: &mut Vec<String>,
    config_field_name: &str,
) {
    for url_to_validate in urls_to_validate {
        if url_to_validate.trim().is_empty() {
            collected_errors.push(format!(
                "Url in key {} url={} is invalid, it must not be blank",
                config_field_name, url_to_validate
            ));
        } else if !(url_to_validate.starts_with("http://")
            || url_to_validate.starts_with("https://"))
        {
            collected_errors.push(format!(
                "Url in key {} url={} is invalid, it should be a fully qualified domain \
                 starting with http:// or https://",
                config_field_name, url_to_validate
            ));
        } else if url::Url::parse(url_to_validate).is_err() {
            collected_errors.push(format!(
                "Url in key {} url={} is invalid, it could not be parsed as a URL",
                config_field_name, url_to_validate
            ));
        }
    }
}
