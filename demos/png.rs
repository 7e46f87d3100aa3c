use std::fs;

use pdf417_symbol::{RenderConfig, Symbol};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let text = args.next().unwrap_or_else(|| "Hello, world!".to_owned());
    let path = args.next().unwrap_or_else(|| "symbol.png".to_owned());

    let mut symbol = Symbol::with_text(&text);
    symbol.set_aspect_ratio(0.5);

    let config = RenderConfig { x_scale: 2, y_scale: 6, margin: 20 };
    match symbol.to_png_bytes(&config) {
        Ok(bytes) => {
            if let Err(err) = fs::write(&path, bytes) {
                eprintln!("could not write {path}: {err}");
                std::process::exit(1);
            }
            println!("wrote {path}");
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
