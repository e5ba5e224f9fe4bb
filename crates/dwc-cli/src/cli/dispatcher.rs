use crate::cli::command_handlers::{
    ConfigHandler, FieldsHandler, RecordHandler, RecordsHandler, SummaryHandler,
};
use crate::cli::main_types::Commands;
use dwc_core::api::client::GatewayClient;
use dwc_core::core::services::config_service::ConfigService;
use dwc_core::error::{AppError, CliError};
use dwc_core::storage::config::Config;
use std::path::PathBuf;

pub struct Dispatcher {
    config: Config,
    config_path: Option<PathBuf>,
    url: Option<String>,
}

impl Dispatcher {
    pub fn new(config: Config, config_path: Option<PathBuf>, url: Option<String>) -> Self {
        Self {
            config,
            config_path,
            url,
        }
    }

    // CLI argument (or DWCV_URL via clap) > config file
    fn get_url(&self) -> Result<String, AppError> {
        self.url
            .clone()
            .filter(|u| !u.is_empty())
            .or_else(|| self.config.get_url())
            .ok_or_else(|| {
                AppError::Cli(CliError::InvalidArguments(
                    "Gateway URL is not configured. Use 'dwc-cli config set --url <url>' or set DWCV_URL environment variable".to_string(),
                ))
            })
    }

    fn create_client(&self) -> Result<GatewayClient, AppError> {
        let url = self.get_url()?;
        log::info!("using gateway {}{}", url, self.config.base_dir());
        GatewayClient::with_options(&url, self.config.base_dir(), self.config.timeout_secs())
    }

    fn create_config_service(&self) -> ConfigService {
        ConfigService::new(self.config.clone())
    }

    pub async fn dispatch(&self, command: Commands) -> Result<String, AppError> {
        match command {
            Commands::Config { command } => {
                let handler = ConfigHandler::new();
                let mut config_service = self.create_config_service();
                // config show/set work without a reachable gateway
                let client = self.create_client().ok();
                handler
                    .handle(command, &mut config_service, self.config_path.clone(), client)
                    .await
            }
            Commands::Summary => {
                let client = self.create_client()?;
                SummaryHandler::new().handle(&client).await
            }
            Commands::Records(args) => {
                let client = self.create_client()?;
                RecordsHandler::new()
                    .handle(args, &self.config, &client)
                    .await
            }
            Commands::Record { id, format } => {
                let client = self.create_client()?;
                RecordHandler::new()
                    .handle(&id, format, &self.config, &client)
                    .await
            }
            Commands::Fields { format } => {
                let client = self.create_client()?;
                FieldsHandler::new().list(format, &client).await
            }
            Commands::Field(args) => {
                let client = self.create_client()?;
                FieldsHandler::new().describe(args, &client).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_url_overrides_config() {
        let mut config = Config::default();
        config.set_url("http://from-file:8000".to_string());
        let dispatcher = Dispatcher::new(config, None, Some("http://from-cli:8000".to_string()));
        assert_eq!(dispatcher.get_url().unwrap(), "http://from-cli:8000");
    }

    #[test]
    fn test_invalid_url_is_reported() {
        let dispatcher = Dispatcher::new(Config::default(), None, Some("not a url".to_string()));
        assert!(matches!(
            dispatcher.create_client(),
            Err(AppError::Cli(CliError::InvalidArguments(_)))
        ));
    }
}
