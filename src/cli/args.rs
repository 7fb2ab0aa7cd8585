// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use clap::{Args, Parser, Subcommand};

/// CLI arguments parser.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = r#"Predict Options:
    --model-dir, -m <DIR>  Directory containing the MoveNet model file [default: .]
    --source, -s <SOURCE>  Input source (image file or directory of images)
    --conf <CONF>          Keypoint confidence threshold [default: 0.2]
    --threads <THREADS>    Intra-op inference threads [default: 4]
    --save                 Save annotated images to runs/pose/predict
    --verbose              Show verbose output

Examples:
    movenet-inference predict --model-dir models/ --source image.jpg
    movenet-inference predict -m models/ -s frames/ --save
    movenet-inference predict -m models/ -s image.jpg --conf 0.3 --threads 2"#)]
pub struct Cli {
    #[command(subcommand)]
    /// Subcommand to execute.
    pub command: Commands,
}

/// Commands for the CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run pose inference on an image or a directory of images
    Predict(PredictArgs),
}

/// Arguments for the predict command.
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Directory containing the MoveNet model file
    #[arg(short, long, default_value = ".")]
    pub model_dir: String,

    /// Input source (image file or directory of images)
    #[arg(short, long)]
    pub source: String,

    /// Keypoint confidence threshold
    #[arg(long, default_value_t = 0.2)]
    pub conf: f32,

    /// Number of intra-op inference threads
    #[arg(long, default_value_t = 4)]
    pub threads: usize,

    /// Save annotated images to runs/pose/predict
    #[arg(long, default_value_t = false)]
    pub save: bool,

    /// Show verbose output
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_predict_args_defaults() {
        let args = Cli::parse_from(["app", "predict", "--source", "image.jpg"]);
        match args.command {
            Commands::Predict(predict_args) => {
                assert_eq!(predict_args.model_dir, ".");
                assert_eq!(predict_args.source, "image.jpg");
                assert!((predict_args.conf - 0.2).abs() < f32::EPSILON);
                assert_eq!(predict_args.threads, 4);
                assert!(!predict_args.save);
                assert!(predict_args.verbose);
            }
        }
    }

    #[test]
    fn test_predict_args_custom() {
        let args = Cli::parse_from([
            "app",
            "predict",
            "--model-dir",
            "models",
            "--source",
            "frames/",
            "--conf",
            "0.35",
            "--threads",
            "2",
            "--save",
            "--verbose",
            "false",
        ]);
        match args.command {
            Commands::Predict(predict_args) => {
                assert_eq!(predict_args.model_dir, "models");
                assert_eq!(predict_args.source, "frames/");
                assert!((predict_args.conf - 0.35).abs() < f32::EPSILON);
                assert_eq!(predict_args.threads, 2);
                assert!(predict_args.save);
                assert!(!predict_args.verbose);
            }
        }
    }
}
