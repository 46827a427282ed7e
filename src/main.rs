// MRZ scanner CLI: read a photographed ID card, print the decoded identity.

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;

use mrzscan::models::{ScanCode, ScanResult};
use mrzscan::processing::TesseractRecognizer;
use mrzscan::{default_strategies, MrzScanner, ScanOptions};

#[derive(Parser)]
#[command(
    name = "mrzscan",
    about = "Decode and validate the machine-readable zone of a national ID card image"
)]
struct Args {
    /// Image file (JPEG/PNG) of one card side
    image: PathBuf,

    /// Also consider the TD3 (passport) format
    #[arg(long)]
    td3: bool,

    /// Print the full scan result as JSON
    #[arg(long)]
    json: bool,

    /// OCR language model
    #[arg(long, default_value = "eng")]
    lang: String,

    /// Wall-clock budget for the whole scan, in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
}

fn print_report(result: &ScanResult) {
    println!("\n===============================================");
    println!("              MRZ SCAN REPORT");
    println!("===============================================\n");

    println!("Result: {:?}", result.code);
    println!("Strategy: {}", result.strategy);
    println!("Status: {:?}", result.validation.status);
    for message in &result.validation.messages {
        println!("  - {}", message);
    }

    if let Some(identity) = &result.data {
        println!("\nIDENTITY:");
        println!("  Format: {:?}", identity.format);
        println!("  Document Type: {}", identity.document_type);
        println!("  Issuing Country: {}", identity.issuing_country);
        println!("  Document Number: {}", identity.document_number);
        println!("  Full Name: {}", identity.full_name);
        println!("  Nationality: {}", identity.nationality);
        match identity.birth_date {
            Some(date) => println!("  Date of Birth: {}", date),
            None => println!("  Date of Birth: (unreadable)"),
        }
        println!("  Sex: {}", identity.sex);
        match identity.expiry_date {
            Some(date) => println!("  Date of Expiry: {}", date),
            None => println!("  Date of Expiry: (unreadable)"),
        }
        println!("\nCHECK DIGITS:");
        println!(
            "  Document Number: {}",
            if identity.checks.document_number_valid {
                "PASSED"
            } else {
                "FAILED"
            }
        );
        println!(
            "  Birth Date: {}",
            if identity.checks.birth_date_valid {
                "PASSED"
            } else {
                "FAILED"
            }
        );
        println!(
            "  Expiry Date: {}",
            if identity.checks.expiry_date_valid {
                "PASSED"
            } else {
                "FAILED"
            }
        );
        println!("\nRAW MRZ:");
        for line in &identity.raw_lines {
            println!("  {}", line);
        }
    }
    println!();
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let image_data = match std::fs::read(&args.image) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Could not read {}: {}", args.image.display(), e);
            process::exit(1);
        }
    };

    let options = ScanOptions {
        allow_td3: args.td3,
        budget: args.timeout_ms.map(Duration::from_millis),
        strategies: default_strategies(),
    };
    let recognizer = TesseractRecognizer::new(&args.lang);
    let scanner = MrzScanner::with_options(Box::new(recognizer), options);

    let result = scanner.scan_bytes(&image_data);

    if args.json {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Could not serialize scan result: {}", e);
                process::exit(1);
            }
        }
    } else {
        print_report(&result);
    }

    if result.code == ScanCode::NoImage {
        process::exit(1);
    }
}
