use anyhow::{Context, Result, bail};
use clap::Args;
use perch_core::preference::{DisplayAnchor, ParameterMap, PreferenceRecord, Vec2};
use std::path::PathBuf;

use super::open_store;

#[derive(Args)]
pub struct SaveArgs {
    /// Model path the record is keyed on
    model_path: String,

    #[arg(long, allow_negative_numbers = true)]
    x: f64,

    #[arg(long, allow_negative_numbers = true)]
    y: f64,

    /// Uniform scale, or the horizontal scale when --scale-y is given
    #[arg(long)]
    scale: f64,

    #[arg(long)]
    scale_y: Option<f64>,

    /// Parameter override, repeatable
    #[arg(long = "param", value_name = "NAME=VALUE", value_parser = parse_parameter)]
    parameters: Vec<(String, f64)>,

    /// Screen point identifying the display the window belongs on
    #[arg(long, value_name = "X,Y", value_parser = parse_display, allow_hyphen_values = true)]
    display: Option<DisplayAnchor>,
}

impl SaveArgs {
    fn into_record(self) -> PreferenceRecord {
        let scale = Vec2::new(self.scale, self.scale_y.unwrap_or(self.scale));
        let mut record = PreferenceRecord::new(self.model_path, Vec2::new(self.x, self.y), scale);
        if !self.parameters.is_empty() {
            record = record.with_parameters(self.parameters.into_iter().collect::<ParameterMap>());
        }
        if let Some(display) = self.display {
            record = record.with_display(display);
        }
        record
    }
}

pub async fn run(config: Option<PathBuf>, args: SaveArgs) -> Result<()> {
    let record = args.into_record();
    record.validate().context("Invalid preference record")?;

    let store = open_store(config)?;
    if !store.save(&record).await {
        bail!("The preference store did not accept the record (see log for details)");
    }
    println!("Saved preferences for {}", record.model_path);
    Ok(())
}

fn parse_parameter(raw: &str) -> std::result::Result<(String, f64), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err("parameter name is empty".to_string());
    }
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid value for '{}': {}", name, e))?;
    Ok((name.to_string(), value))
}

fn parse_display(raw: &str) -> std::result::Result<DisplayAnchor, String> {
    let (x, y) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{}'", raw))?;
    let x = x.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<f64>().map_err(|e| e.to_string())?;
    Ok(DisplayAnchor::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct SaveCommand {
        #[command(flatten)]
        args: SaveArgs,
    }

    #[test]
    fn test_parse_parameter() {
        assert_eq!(
            parse_parameter("ParamEyeLOpen=0.8").unwrap(),
            ("ParamEyeLOpen".to_string(), 0.8)
        );
        assert_eq!(
            parse_parameter(" ParamAngleX = -12.5 ").unwrap(),
            ("ParamAngleX".to_string(), -12.5)
        );
        assert!(parse_parameter("ParamEyeLOpen").is_err());
        assert!(parse_parameter("=1").is_err());
        assert!(parse_parameter("ParamEyeLOpen=open").is_err());
    }

    #[test]
    fn test_parse_display() {
        assert_eq!(
            parse_display("1920,-40").unwrap(),
            DisplayAnchor::new(1920.0, -40.0)
        );
        assert!(parse_display("1920").is_err());
    }

    #[test]
    fn test_into_record() {
        let args = SaveArgs {
            model_path: "/models/Hiyori/Hiyori.model3.json".to_string(),
            x: 10.0,
            y: 20.0,
            scale: 0.2,
            scale_y: None,
            parameters: vec![("ParamEyeLOpen".to_string(), 0.8)],
            display: None,
        };
        let record = args.into_record();
        assert_eq!(record.scale, Vec2::splat(0.2));
        assert!(record.has_parameters());
        assert!(record.display.is_none());
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_display_left_of_primary_parses() {
        let command = SaveCommand::try_parse_from([
            "save",
            "/models/Hiyori/Hiyori.model3.json",
            "--x",
            "-40",
            "--y",
            "200",
            "--scale",
            "0.2",
            "--display",
            "-1920,0",
        ])
        .unwrap();

        assert_eq!(command.args.x, -40.0);
        assert_eq!(command.args.display, Some(DisplayAnchor::new(-1920.0, 0.0)));
    }
}
