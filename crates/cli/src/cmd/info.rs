use gobuilder_lib::execute::Programs;
use gobuilder_lib::platform::Platform;

use crate::output::print_stat;

pub fn cmd_info(programs: &Programs) {
  println!("gobuilder {}", env!("CARGO_PKG_VERSION"));
  print_stat("Host platform", &Platform::host().to_string());
  print_stat("Compiler", &programs.compiler);
  print_stat("Container runtime", &programs.container_runtime);
  print_stat("Inspector", &programs.inspector);
}
