use pdf417_symbol::Symbol;

fn main() {
    env_logger::init();

    let text = std::env::args().nth(1).unwrap_or_else(|| "Hello, world!".to_owned());

    let mut symbol = Symbol::with_text(&text);
    match symbol.to_text_grid_display() {
        Ok(grid) => {
            // full-block characters read better than '1's on a terminal
            for line in &grid {
                println!("{}", line.replace('1', "\u{2588}"));
            }
            println!(
                "{} rows x {} cols, error level {}",
                symbol.rows().unwrap_or(0),
                symbol.cols().unwrap_or(0),
                symbol.error_level().unwrap_or(0),
            );
        }
        Err(err) => eprintln!("error: {err}"),
    }
}
