use std::process::Command;

pub mod md;

/// Render a command as `program arg1 arg2 ...` for logs and error messages.
pub fn command_line(cmd: &Command) -> String {
    let prog = cmd.get_program().to_string_lossy();
    let args = cmd
        .get_args()
        .map(|a| a.to_string_lossy())
        .collect::<Vec<_>>();
    if args.is_empty() {
        prog.into_owned()
    } else {
        format!("{} {}", prog, args.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_program_and_args() {
        let mut cmd = Command::new("cc");
        assert_eq!(command_line(&cmd), "cc");
        cmd.args(["-o", "bin/add", "src/add/add.c"]);
        assert_eq!(command_line(&cmd), "cc -o bin/add src/add/add.c");
    }
}
