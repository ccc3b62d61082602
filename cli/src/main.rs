use bumpalo::Bump;
use clap::Parser;
use miette::{IntoDiagnostic, Result, miette};
use reedline::{
    DefaultCompleter, DefaultPrompt, DefaultPromptSegment, DescriptionMode, EditCommand, Emacs,
    FileBackedHistory, IdeMenu, KeyCode, KeyModifiers, Keybindings, MenuBuilder, Reedline,
    ReedlineEvent, ReedlineMenu, Signal, default_emacs_keybindings,
};
use std::io::Read;
use std::path::PathBuf;
use stepwise::{
    CompileOptions, CompileResult, Engine, EngineOptions, InMemoryStore, Outcome,
    render_error_to_string, render_error_to_string_no_color, sample, samples,
};

mod highlighter;

use highlighter::{Highlighter, InputValidator};

const REPL_COMMANDS: &[&str] = &[":help", ":examples", ":load", ":history", ":quit"];

/// Stepwise - a teaching compiler that shows every step
#[derive(Parser, Debug)]
#[command(name = "stepwise")]
#[command(about = "Compile stepwise programs to assembly and machine code", long_about = None)]
struct Args {
    /// Source file to compile (reads stdin when piped, starts a REPL otherwise)
    file: Option<PathBuf>,

    /// Compile this program text instead of a file
    #[arg(short, long, value_name = "CODE")]
    eval: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Print the compilation trace
    #[arg(long)]
    steps: bool,

    /// Print the token stream
    #[arg(long)]
    tokens: bool,

    /// Print the AST as JSON
    #[arg(long)]
    ast: bool,

    /// List the built-in example programs and exit
    #[arg(long)]
    examples: bool,

    /// Disable colors in diagnostics and the REPL
    #[arg(long)]
    no_color: bool,
}

struct Session<'s> {
    engine: Engine<'s>,
    args: Args,
}

impl Session<'_> {
    /// Compile and print one program. Returns whether it succeeded.
    fn run(&self, source: &str, save: bool) -> Result<bool> {
        let arena = Bump::new();
        let options = CompileOptions {
            save,
            ..CompileOptions::default()
        };
        let result = self.engine.compile_with(&arena, source, options);

        if self.args.json {
            let json = serde_json::to_string_pretty(&result).into_diagnostic()?;
            println!("{}", json);
        } else {
            self.print_result(&result, source)?;
        }
        Ok(result.is_success())
    }

    fn print_result(&self, result: &CompileResult<'_>, source: &str) -> Result<()> {
        match &result.outcome {
            Outcome::Success(program) => {
                if self.args.tokens {
                    println!("=== Tokens ===");
                    for token in &program.tokens {
                        println!(
                            "{:>3}:{:<3} {:<12} {}",
                            token.line,
                            token.column,
                            token.kind.to_string(),
                            token.value
                        );
                    }
                    println!();
                }
                if self.args.ast {
                    println!("=== AST ===");
                    let ast = serde_json::to_string_pretty(&program.ast).into_diagnostic()?;
                    println!("{}", ast);
                    println!();
                }

                println!("=== Assembly ===");
                for line in program.assembly_lines() {
                    println!("  {}", line);
                }
                println!("=== Machine code ===");
                for word in program.machine_code_lines() {
                    println!("  {}", word);
                }
                for suggestion in &program.suggestions {
                    println!("hint: {}", suggestion);
                }
            }
            Outcome::PhaseFailure { .. } | Outcome::Fault(_) => {
                if let Some(label) = result.error_label() {
                    eprintln!("{}", label);
                }
                if let Err(error) = result.clone().into_result() {
                    let rendered = if self.args.no_color {
                        render_error_to_string_no_color(&error, source)
                    } else {
                        render_error_to_string(&error, source)
                    };
                    eprint!("{}", rendered);
                }
            }
        }

        if self.args.steps {
            println!("=== Steps ===");
            for step in &result.steps {
                println!(
                    "{} [{}] {}",
                    step.timestamp.format("%H:%M:%S%.3f"),
                    step.stage,
                    step.message
                );
            }
        }
        Ok(())
    }
}

fn print_examples() {
    for sample in samples() {
        println!("{} - {}", sample.name, sample.description);
        for line in sample.source.lines() {
            println!("    {}", line);
        }
    }
}

fn add_menu_keybindings(keybindings: &mut Keybindings) {
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::UntilFound(vec![
            ReedlineEvent::Menu("completion_menu".to_string()),
            ReedlineEvent::MenuNext,
        ]),
    );
    keybindings.add_binding(
        KeyModifiers::ALT,
        KeyCode::Enter,
        ReedlineEvent::Edit(vec![EditCommand::InsertNewline]),
    );
}

fn setup_reedline(use_color: bool) -> (Reedline, DefaultPrompt) {
    let mut commands: Vec<String> = REPL_COMMANDS.iter().map(|c| c.to_string()).collect();
    commands.extend(["print".to_string(), "let".to_string()]);

    let completer = Box::new({
        let mut completions = DefaultCompleter::with_inclusions(&[':', '_']);
        completions.insert(commands);
        completions
    });

    let ide_menu = IdeMenu::default()
        .with_name("completion_menu")
        .with_min_completion_width(0)
        .with_max_completion_width(50)
        .with_max_completion_height(u16::MAX)
        .with_padding(0)
        .with_cursor_offset(0)
        .with_description_mode(DescriptionMode::PreferRight)
        .with_min_description_width(0)
        .with_max_description_width(50)
        .with_description_offset(1)
        .with_correct_cursor_pos(false);

    let mut keybindings = default_emacs_keybindings();
    add_menu_keybindings(&mut keybindings);

    let mut line_editor = Reedline::create()
        .with_validator(Box::new(InputValidator))
        .with_completer(completer)
        .with_menu(ReedlineMenu::EngineCompleter(Box::new(ide_menu)))
        .with_edit_mode(Box::new(Emacs::new(keybindings)));

    if use_color {
        line_editor = line_editor.with_highlighter(Box::new(Highlighter));
    }

    let history_path = dirs::home_dir().map(|home| home.join(".stepwise_history"));
    if let Some(path) = history_path {
        match FileBackedHistory::with_file(500, path) {
            Ok(history) => line_editor = line_editor.with_history(Box::new(history)),
            Err(e) => tracing::warn!(error = %e, "history disabled"),
        }
    }

    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic("stepwise".to_string()),
        DefaultPromptSegment::Empty,
    );

    (line_editor, prompt)
}

fn repl(session: &Session<'_>, store: &InMemoryStore) -> Result<()> {
    let (mut line_editor, prompt) = setup_reedline(!session.args.no_color);

    println!("Stepwise REPL - type statements to compile, :help for commands (Ctrl+D to exit)");

    loop {
        let sig = match line_editor.read_line(&prompt) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Reedline error: {e}");
                return Ok(());
            }
        };

        match sig {
            Signal::Success(buffer) => {
                let input = buffer.trim();
                match input.split_once(' ').unwrap_or((input, "")) {
                    (":quit", _) => return Ok(()),
                    (":help", _) => println!("commands: {}", REPL_COMMANDS.join(" ")),
                    (":examples", _) => print_examples(),
                    (":load", name) => match sample(name.trim()) {
                        Some(sample) => {
                            println!("{}", sample.source.trim_end());
                            session.run(sample.source, true)?;
                        }
                        None => eprintln!("no example named '{}'", name.trim()),
                    },
                    (":history", _) => {
                        for record in store.history() {
                            println!(
                                "{} {}  {}",
                                record.id,
                                record.saved_at.format("%H:%M:%S"),
                                record.source.replace('\n', " ")
                            );
                        }
                    }
                    ("", _) => {}
                    _ => {
                        session.run(&buffer, true)?;
                    }
                }
            }
            Signal::CtrlD | Signal::CtrlC => {
                println!("\nGoodbye!");
                return Ok(());
            }
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging subscriber
    use tracing_subscriber::{EnvFilter, fmt};

    // Use RUST_LOG to control the log level, default to WARN
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .into_diagnostic()?;

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if args.examples {
        print_examples();
        return Ok(());
    }

    let store = InMemoryStore::new();
    let source = match (&args.eval, &args.file) {
        (Some(code), _) => Some(code.clone()),
        (None, Some(path)) => Some(std::fs::read_to_string(path).into_diagnostic()?),
        (None, None) if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .into_diagnostic()?;
            Some(buffer)
        }
        (None, None) => None,
    };

    let session = Session {
        engine: Engine::new(EngineOptions::default()).with_store(&store),
        args,
    };

    match source {
        Some(source) => {
            if session.run(&source, false)? {
                Ok(())
            } else {
                Err(miette!("compilation failed"))
            }
        }
        None => repl(&session, &store),
    }
}
