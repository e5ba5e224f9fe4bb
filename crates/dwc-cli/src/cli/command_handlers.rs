use crate::cli::main_types::{ConfigCommands, FieldArgs, OutputFormat, RecordsArgs};
use dwc_core::api::client::GatewayClient;
use dwc_core::core::fields::{FieldDescriptor, FieldSet};
use dwc_core::core::menu::MenuOverlay;
use dwc_core::core::record_table::RecordTable;
use dwc_core::core::records_table::RecordsTable;
use dwc_core::core::services::config_service::ConfigService;
use dwc_core::display::TableDisplay;
use dwc_core::error::{AppError, CliError};
use dwc_core::storage::config::Config;
use dwc_core::utils::validation::{validate_field_key, validate_page_size};
use std::path::PathBuf;

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Cli(CliError::Output(format!("Failed to encode JSON: {}", e))))
}

/// Columns for `--fields`, in the given order. Configured labels and
/// defaults are kept; configured weights are dropped so the order sticks.
pub fn select_fields(configured: &[FieldDescriptor], csv: &str) -> Result<Vec<FieldDescriptor>, AppError> {
    let mut selected = Vec::new();
    for key in csv.split(',').map(str::trim).filter(|k| !k.is_empty()) {
        validate_field_key(key)?;
        let mut field = configured
            .iter()
            .find(|f| f.key == key)
            .cloned()
            .unwrap_or_else(|| FieldDescriptor::new(key));
        field.displayed = true;
        field.display_weight = None;
        selected.push(field);
    }
    if selected.is_empty() {
        return Err(AppError::Cli(CliError::InvalidArguments(
            "--fields needs at least one field key".to_string(),
        )));
    }
    Ok(selected)
}

#[derive(Default)]
pub struct ConfigHandler;

impl ConfigHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: ConfigCommands,
        config_service: &mut ConfigService,
        config_path: Option<PathBuf>,
        client: Option<GatewayClient>,
    ) -> Result<String, AppError> {
        match command {
            ConfigCommands::Show => {
                log::info!("showing configuration");
                let display = TableDisplay::new();
                Ok(format!(
                    "Current Configuration:\n{}",
                    display.render_key_values(&config_service.describe())
                ))
            }
            ConfigCommands::Set {
                url,
                base_dir,
                count,
            } => {
                let mut updated_fields = Vec::new();

                if let Some(url_value) = url {
                    config_service.set_url(url_value.clone())?;
                    updated_fields.push(format!("URL to: {}", url_value));
                }
                if let Some(dir) = base_dir {
                    updated_fields.push(format!("base dir to: {}", dir));
                    config_service.set_base_dir(dir);
                }
                if let Some(count) = count {
                    config_service.set_page_size(count)?;
                    updated_fields.push(format!("page size to: {}", count));
                }

                if updated_fields.is_empty() {
                    return Err(AppError::Cli(CliError::InvalidArguments(
                        "No configuration values provided. Use --url, --base-dir or --count".to_string(),
                    )));
                }

                config_service.save_config(config_path)?;
                Ok(format!(
                    "✅ Set {}\nConfiguration saved successfully.",
                    updated_fields.join(", ")
                ))
            }
            ConfigCommands::Validate => {
                let client = client.ok_or_else(|| {
                    AppError::Cli(CliError::InvalidArguments(
                        "Gateway URL is not configured".to_string(),
                    ))
                })?;
                let summary = client.summary().await?;
                Ok(format!(
                    "✅ Connected to {} ({} records)",
                    client.base(),
                    summary.num_records
                ))
            }
        }
    }
}

#[derive(Default)]
pub struct RecordsHandler;

impl RecordsHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        args: RecordsArgs,
        config: &Config,
        client: &GatewayClient,
    ) -> Result<String, AppError> {
        let mut options = config.records_table_options();
        options.start = args.start;
        if let Some(count) = args.count {
            validate_page_size(count)?;
            options.count = count;
        }
        if let Some(orderby) = args.orderby {
            validate_field_key(&orderby)?;
            options.default_sort = Some(orderby);
        }
        if let Some(order) = args.order {
            options.default_order = order.parse().map_err(CliError::InvalidArguments)?;
        }
        if args.no_row_numbers {
            options.row_numbers = false;
        }
        if let Some(csv) = &args.fields {
            options.fields = select_fields(&options.fields, csv)?;
        }
        options.filter = args.filter;

        let mut table = RecordsTable::new(options, MenuOverlay::new())?;
        table.load(client, false).await?;

        match args.format {
            OutputFormat::Json => match table.cached_page() {
                Some(page) => to_json(page),
                None => Ok("{}".to_string()),
            },
            OutputFormat::Table => Ok(TableDisplay::new().render_records(
                table.header(),
                table.rows(),
                table.paging_label(),
            )),
        }
    }
}

#[derive(Default)]
pub struct RecordHandler;

impl RecordHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        id: &str,
        format: OutputFormat,
        config: &Config,
        client: &GatewayClient,
    ) -> Result<String, AppError> {
        let mut detail = RecordTable::new(config.table.id_field.clone());
        let request = detail.set_record_id(id, false);
        let record = client.record(&request.id).await?;
        detail.apply_record(request.seq, Ok(record))?;

        match (format, detail.record()) {
            (OutputFormat::Json, Some(record)) => to_json(record),
            _ => {
                let labels = FieldSet::new(config.records_table_options().fields)?;
                Ok(TableDisplay::new().render_record_grid(&detail.grid(Some(&labels))))
            }
        }
    }
}

#[derive(Default)]
pub struct FieldsHandler;

impl FieldsHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn list(&self, format: OutputFormat, client: &GatewayClient) -> Result<String, AppError> {
        let catalog = client.fields().await?;
        match format {
            OutputFormat::Json => to_json(&catalog),
            OutputFormat::Table => Ok(TableDisplay::new().render_fields(&catalog)),
        }
    }

    pub async fn describe(&self, args: FieldArgs, client: &GatewayClient) -> Result<String, AppError> {
        validate_field_key(&args.name)?;

        if args.values {
            let values = client
                .field_values(&args.name, args.filter.as_deref(), args.count)
                .await?;
            return match args.format {
                OutputFormat::Json => to_json(&values),
                OutputFormat::Table => Ok(TableDisplay::new().render_field_values(&values)),
            };
        }

        let info = client.field_info(&args.name).await?;
        match args.format {
            OutputFormat::Json => to_json(&info),
            OutputFormat::Table => {
                let rows = vec![
                    ("Name".to_string(), info.name.clone()),
                    (
                        "Type".to_string(),
                        info.field_type.clone().unwrap_or_else(|| "-".to_string()),
                    ),
                    (
                        "Distinct values".to_string(),
                        info.distinct.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
                    ),
                    (
                        "Stored".to_string(),
                        info.stored.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string()),
                    ),
                ];
                Ok(TableDisplay::new().render_key_values(&rows))
            }
        }
    }
}

#[derive(Default)]
pub struct SummaryHandler;

impl SummaryHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(&self, client: &GatewayClient) -> Result<String, AppError> {
        let summary = client.summary().await?;
        Ok(TableDisplay::new().render_summary(&summary))
    }
}
