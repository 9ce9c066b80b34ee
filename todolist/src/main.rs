use anyhow::Result;

use todolist::menu;
use todolist::store::MemoryStore;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut store = MemoryStore::new();
    menu::run(&mut store, stdin.lock(), stdout.lock())
}
