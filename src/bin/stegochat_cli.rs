//! stegochat CLI: hide, reveal, and capacity-check messages in images.
//! Build with: cargo build --release --bin stegochat-cli

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use stegochat::{capacity_bits, carrier, hide_message, reveal_message};

fn usage() -> &'static str {
    r#"stegochat-cli — hide encrypted messages in images

Usage:
  stegochat-cli hide <cover.png> -o <out.png> --message <text|@file> [--passcode <text>]
  stegochat-cli reveal <stego.png> [--passcode <text>]
  stegochat-cli capacity <image.png>

Hide:
  --message <text>       Message as a UTF-8 string
  --message @<path>      Message read from a file
  --passcode <text>      Protect the message with a passcode (PBKDF2 key);
                         without it the key travels inside the image itself
  -o, --output <path>    Output PNG path (required; output must stay lossless)

Reveal:
  Writes the decrypted message to stdout. Exit 0 on success.
  --passcode <text>      Required if the message was hidden with one.

Capacity:
  Prints the usable LSB capacity of the image in bits and bytes.
"#
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("{}", usage());
        std::process::exit(1);
    }
    let sub = &args[1];
    let result = match sub.as_str() {
        "hide" => run_hide(&args[2..]),
        "reveal" => run_reveal(&args[2..]),
        "capacity" => run_capacity(&args[2..]),
        _ => {
            eprintln!("{}", usage());
            std::process::exit(1);
        }
    };
    if let Err(e) = result {
        eprintln!("{} error: {}", sub, e);
        std::process::exit(1);
    }
}

fn run_hide(args: &[String]) -> Result<(), String> {
    let mut cover: Option<&str> = None;
    let mut output: Option<&str> = None;
    let mut message: Option<String> = None;
    let mut passcode: Option<String> = None;

    let mut i = 0;
    while i < args.len() {
        let a = &args[i];
        if a == "-o" || a == "--output" {
            i += 1;
            output = Some(args.get(i).ok_or("missing value for -o/--output")?);
        } else if a == "--message" {
            i += 1;
            let v = args.get(i).ok_or("missing value for --message")?;
            if let Some(path) = v.strip_prefix('@') {
                message = Some(fs::read_to_string(path).map_err(|e| e.to_string())?);
            } else {
                message = Some(v.clone());
            }
        } else if a == "--passcode" {
            i += 1;
            passcode = Some(args.get(i).ok_or("missing value for --passcode")?.clone());
        } else if !a.starts_with('-') && cover.is_none() {
            cover = Some(a);
        }
        i += 1;
    }

    let cover_path = cover.ok_or("hide requires <cover.png>")?;
    let output_path = output.ok_or("hide requires -o/--output <out.png>")?;
    let message = message.ok_or("hide requires --message <text|@file>")?;

    let img = carrier::load_rgba(Path::new(cover_path)).map_err(|e| e.to_string())?;
    let (w, h) = img.dimensions();
    let mut pixels = img.into_raw();

    hide_message(&mut pixels, &message, passcode.as_deref()).map_err(|e| e.to_string())?;

    let png = carrier::write_png(&pixels, w, h).map_err(|e| e.to_string())?;
    fs::write(output_path, png).map_err(|e| e.to_string())?;
    eprintln!("Wrote {}", output_path);
    Ok(())
}

fn run_reveal(args: &[String]) -> Result<(), String> {
    let mut image_path: Option<&str> = None;
    let mut passcode: Option<String> = None;

    let mut i = 0;
    while i < args.len() {
        let a = &args[i];
        if a == "--passcode" {
            i += 1;
            passcode = Some(args.get(i).ok_or("missing value for --passcode")?.clone());
        } else if !a.starts_with('-') && image_path.is_none() {
            image_path = Some(a);
        }
        i += 1;
    }

    let path_str = image_path.ok_or("reveal requires <stego.png>")?;
    let img = carrier::load_rgba(Path::new(path_str)).map_err(|e| e.to_string())?;
    let pixels = img.into_raw();

    let plaintext = reveal_message(&pixels, passcode.as_deref()).map_err(|e| e.to_string())?;
    io::stdout()
        .write_all(plaintext.as_bytes())
        .map_err(|e| e.to_string())?;
    Ok(())
}

fn run_capacity(args: &[String]) -> Result<(), String> {
    let path_str = args
        .iter()
        .find(|a| !a.starts_with('-'))
        .ok_or("capacity requires <image.png>")?;
    let img = carrier::load_rgba(Path::new(path_str)).map_err(|e| e.to_string())?;
    let bits = capacity_bits(img.as_raw().len());
    println!("{} bits ({} bytes usable)", bits, bits / 8);
    Ok(())
}
