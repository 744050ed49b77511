use faxc_drv::Session;
use std::path::PathBuf;

fn main() {
    let mut args = std::env::args().skip(1);
    let Some(source) = args.next() else {
        eprintln!("usage: faxc <source.fax> [-o <out_dir>]");
        std::process::exit(3);
    };

    let mut out_dir = PathBuf::from("target/fax-out");
    if let Some(flag) = args.next() {
        if flag == "-o" {
            if let Some(dir) = args.next() {
                out_dir = PathBuf::from(dir);
            }
        }
    }

    let mut session = Session::new(source, out_dir);
    match session.compile() {
        Ok(output) => {
            println!("{}", output.object.display());
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
