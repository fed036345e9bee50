use std::process;

use dynstack::ops::OP_VARIANTS;
use dynstack::{parse_script, stack_interact, Stack};

const SCRIPT: &str = "
    push 5
    push 3
    push 8
    size
    pop
    size
    peek
    size
    pop
    pop
    is_empty
    pop
    clear
    is_empty
    size
";

fn main() {
    println!("supported: {}", OP_VARIANTS[1..].join(", "));

    let ops = match parse_script(SCRIPT) {
        Ok(ops) => ops,
        Err(err) => {
            eprintln!("bad script: {}", err);
            process::exit(1);
        }
    };

    let mut stack = Stack::new().with_metrics();
    for op in ops {
        let shown = format!("{:?}", op);
        let reply = stack_interact(op, &mut stack);
        println!("{:<12} -> {:<22} {}", shown, reply.to_string(), stack);
    }
    if let Some(metrics) = stack.metrics() {
        println!("{:?}", metrics);
    }
}
