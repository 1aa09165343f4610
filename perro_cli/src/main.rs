use perro_net_compiler::{CompileOutput, SchemaCompiler};
use perro_project::{Project, resolve_local_path};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_OUTPUT: &str = ".perro/network_registry.json";

fn main() {
    let args: Vec<String> = env::args().collect();
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let Some(command) = args.get(1).map(String::as_str) else {
        print_usage();
        std::process::exit(2);
    };

    init_logging(args.iter().any(|a| a == "--verbose" || a == "-v"));

    let result = match command {
        "build" => build_command(&args, &cwd),
        "check" => check_command(&args, &cwd),
        "scenes" => scenes_command(&args, &cwd),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        _ => {
            print_usage();
            Err(format!("unknown command `{command}`"))
        }
    };

    if let Err(err) = result {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  perro_net build [--path <project_dir>] [--out <file>] [--verbose]");
    eprintln!("  perro_net check [--path <project_dir>] [--verbose]   # compile without writing");
    eprintln!("  perro_net scenes [--path <project_dir>]              # list network scenes");
}

fn parse_flag_value(args: &[String], flag: &str) -> Option<String> {
    let idx = args.iter().position(|a| a == flag)?;
    args.get(idx + 1).cloned()
}

fn project_dir(args: &[String], cwd: &Path) -> PathBuf {
    parse_flag_value(args, "--path")
        .map(|p| resolve_local_path(&p, cwd))
        .unwrap_or_else(|| cwd.to_path_buf())
}

fn compile_project(project_dir: &Path) -> Result<CompileOutput, String> {
    let project = Project::load(project_dir)
        .map_err(|err| format!("failed to load project at {}: {err}", project_dir.display()))?;
    let roots = project
        .network_scenes()
        .map_err(|err| format!("failed to list scenes in {}: {err}", project_dir.display()))?;
    if roots.is_empty() {
        return Err(format!("no scenes to compile in {}", project_dir.display()));
    }
    let classes = project
        .load_classes()
        .map_err(|err| format!("failed to load class manifests: {err}"))?;

    log::info!(
        "project `{}`: {} root scene(s), {} class(es)",
        project.config.name,
        roots.len(),
        classes.len()
    );

    let mut compiler =
        SchemaCompiler::with_config(project.descriptor_source(), classes, project.compiler_config());
    compiler
        .run(&roots)
        .map_err(|err| format!("network schema compilation failed: {err}"))
}

fn build_command(args: &[String], cwd: &Path) -> Result<(), String> {
    let project_dir = project_dir(args, cwd);
    let output = compile_project(&project_dir)?;

    let out_path = parse_flag_value(args, "--out")
        .map(|p| resolve_local_path(&p, cwd))
        .unwrap_or_else(|| project_dir.join(DEFAULT_OUTPUT));
    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| format!("failed to create {}: {err}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(&output.registry)
        .map_err(|err| format!("failed to serialize registry: {err}"))?;
    fs::write(&out_path, json)
        .map_err(|err| format!("failed to write {}: {err}", out_path.display()))?;

    println!(
        "wrote {} network scene(s) to {} ({} diagnostic(s))",
        output.registry.scene_count(),
        out_path.display(),
        output.diagnostics.len()
    );
    Ok(())
}

fn check_command(args: &[String], cwd: &Path) -> Result<(), String> {
    let output = compile_project(&project_dir(args, cwd))?;
    for diagnostic in &output.diagnostics {
        println!("warning: {diagnostic}");
    }
    println!(
        "ok: {} network scene(s), {} diagnostic(s)",
        output.registry.scene_count(),
        output.diagnostics.len()
    );
    Ok(())
}

fn scenes_command(args: &[String], cwd: &Path) -> Result<(), String> {
    let output = compile_project(&project_dir(args, cwd))?;
    let registry = &output.registry;
    println!("{:>3}  {:>5}  {:>5}  {:>5}  path", "id", "nodes", "props", "funcs");
    for (id, path) in registry.scenes() {
        let props: usize = registry
            .properties(path)
            .map(|nodes| nodes.values().map(|m| m.len()).sum())
            .unwrap_or(0);
        let funcs: usize = registry
            .functions(path)
            .map(|nodes| nodes.values().map(|m| m.len()).sum())
            .unwrap_or(0);
        println!(
            "{:>3}  {:>5}  {:>5}  {:>5}  {path}",
            id.as_u8(),
            registry.static_network_nodes(path).len(),
            props,
            funcs
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_flag_value_reads_following_arg() {
        let argv = args(&["perro_net", "build", "--path", "game", "--out", "out.json"]);
        assert_eq!(parse_flag_value(&argv, "--path").as_deref(), Some("game"));
        assert_eq!(parse_flag_value(&argv, "--out").as_deref(), Some("out.json"));
        assert_eq!(parse_flag_value(&argv, "--name"), None);
    }

    #[test]
    fn project_dir_defaults_to_cwd() {
        let cwd = PathBuf::from("/work");
        assert_eq!(project_dir(&args(&["perro_net", "check"]), &cwd), cwd);
        assert_eq!(
            project_dir(&args(&["perro_net", "check", "--path", "/game"]), &cwd),
            cwd.join("game")
        );
    }
}
