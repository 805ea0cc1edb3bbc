pub mod charges;
pub mod kernel;
pub mod mus;
pub mod normal_form;
pub mod synth;

use crate::IoArgs;

/// Prints `NAME:VERDICT[:detail]` lines.
///
/// They go to stdout when the certificate was written to `--out` and to
/// stderr otherwise, so a certificate piped from stdout stays valid JSON.
pub fn print_status<S: AsRef<str>>(io: &IoArgs, lines: &[S]) {
    for line in lines {
        if io.out.is_some() {
            println!("{}", line.as_ref());
        } else {
            eprintln!("{}", line.as_ref());
        }
    }
}
