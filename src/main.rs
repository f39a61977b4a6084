use std::env;
use std::io;

use damson_chess::uci::uci_loop;

fn main() -> io::Result<()> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    uci_loop::run(&args)
}
