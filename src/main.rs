use std::path::PathBuf;

use clap::Parser;
use nifti_dicom::{ConversionRequest, Converter, ConverterConfig, DirectoryStore};
use tracing::Level;

/// Convert NIfTI-1 volumes into DICOM files, one file per slice
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// NIfTI files to convert (.nii or .nii.gz)
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<PathBuf>,

    /// Directory receiving the DICOM files
    #[arg(short, long, default_value = "./")]
    out: PathBuf,

    /// Modality: CT, MR, MRT1, MRT2 or any other DICOM modality code
    #[arg(long)]
    modality: Option<String>,

    #[arg(long)]
    manufacturer: Option<String>,

    #[arg(long)]
    institution_name: Option<String>,

    #[arg(long)]
    patient_name: Option<String>,

    /// Patient ID, random if not given
    #[arg(long)]
    patient_id: Option<String>,

    /// Body part code: Ab, Th, ThAb or Wb
    #[arg(long)]
    body_part: Option<String>,

    /// Root of the generated UIDs
    #[arg(long)]
    uid_root: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let config = match args.uid_root.as_deref().map(ConverterConfig::new) {
        Some(Ok(config)) => config,
        Some(Err(e)) => {
            eprintln!("Error! {}", e);
            std::process::exit(-2);
        }
        None => ConverterConfig::default(),
    };

    let request = ConversionRequest {
        modality: args.modality,
        manufacturer: args.manufacturer,
        institution_name: args.institution_name,
        patient_name: args.patient_name,
        patient_id: args.patient_id,
        body_part: args.body_part,
    };

    let mut converter = Converter::new(&config);
    let mut store = DirectoryStore::new(&args.out);
    let report = nifti_dicom::convert_paths(&mut converter, &request, &args.inputs, &mut store);

    for location in &report.locations {
        println!("{location}");
    }
    if report.locations.is_empty() {
        eprintln!(
            "Error! No DICOM records written from {} NIfTI file(s)",
            report.nifti_files
        );
        std::process::exit(-2);
    }
}
