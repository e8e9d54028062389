use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::{style, Stylize};
use crossterm::terminal::{Clear, ClearType};
use image::DynamicImage;
use picto_core::core::types::{CanonicalKey, PictogramVariant, ResolutionPolicy};
use picto_core::gallery::GalleryPresenter;
use picto_core::{PictoConfig, PictoEngine, PictoError};
use std::fs::File;
use std::io::{self, stdin, stdout, BufRead, Write};
use std::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging(config: &PictoConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let log_file = config
        .log_path
        .as_ref()
        .map(|path| File::options().create(true).append(true).open(path));
    match log_file {
        Some(Ok(file)) => builder.with_ansi(false).with_writer(Mutex::new(file)).init(),
        Some(Err(e)) => {
            builder.with_writer(io::stderr).init();
            error!("Cannot open log file, logging to stderr: {}", e);
        }
        None => builder.with_writer(io::stderr).init(),
    }
}

/// What the user has entered so far.
#[derive(Default)]
struct Session {
    sentence: String,
    words: Vec<CanonicalKey>,
}

fn main() -> Result<(), PictoError> {
    let config = PictoConfig::load()?;
    init_logging(&config);
    info!("Pictogram directory: {}", config.pictogram_dir.display());

    let mut engine = PictoEngine::from_config(&config)?;
    let mut gallery = GalleryPresenter::new(&config.gallery_path, config.layout());
    let mut variant = config.variant;
    let mut session = Session::default();
    let mut status = vec!["Escribe una frase y pulsa [Enter].".to_string()];

    let stdin = stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print_ui(&session, variant, engine.policy(), &status)?;

        let input = match lines.next() {
            Some(line) => line?,
            None => {
                // Input is gone; the prompt still shows and reads as yes.
                confirm_quit(&mut lines)?;
                break;
            }
        };
        let cmd = input.trim();

        status = match cmd {
            ":quit" | ":salir" => {
                if confirm_quit(&mut lines)? {
                    break;
                }
                vec![]
            }
            ":clear" | ":limpiar" => {
                session = Session::default();
                gallery.clear()?;
                vec!["Limpio.".to_string()]
            }
            ":show" | ":mostrar" => show_pictograms(&engine, &mut gallery, &session, variant),
            s if s.starts_with(":level") || s.starts_with(":nivel") => {
                match s.split_whitespace().nth(1) {
                    Some("bn") | Some("b/n") => variant = PictogramVariant::Monochrome,
                    Some("color") => variant = PictogramVariant::Color,
                    _ => {}
                }
                vec![format!("Nivel: {}", variant)]
            }
            s if s.starts_with(":policy") => {
                match s.split_whitespace().nth(1) {
                    Some("pair") => engine.set_policy(ResolutionPolicy::Pairwise),
                    Some("single") => engine.set_policy(ResolutionPolicy::SingleKey),
                    _ => {}
                }
                vec![format!("Política: {:?}", engine.policy())]
            }
            s if s.starts_with(':') => vec![format!("Orden desconocida: {}", s)],
            sentence => submit(&engine, &mut session, sentence),
        };
    }

    gallery.clear()?;
    println!("\nAdiós.");
    Ok(())
}

fn submit(engine: &PictoEngine, session: &mut Session, sentence: &str) -> Vec<String> {
    match engine.important_words(sentence) {
        Ok(words) => {
            session.sentence = sentence.to_string();
            session.words = words;
            vec!["Escribe ':show' para ver los pictogramas.".to_string()]
        }
        Err(PictoError::EmptyInput) => vec!["Por favor, introduzca un texto.".to_string()],
        Err(e) => {
            error!("Extraction failed: {}", e);
            vec![format!("Error: {}", e)]
        }
    }
}

fn show_pictograms(
    engine: &PictoEngine,
    gallery: &mut GalleryPresenter,
    session: &Session,
    variant: PictogramVariant,
) -> Vec<String> {
    if session.words.is_empty() {
        return vec!["Por favor, introduzca un texto.".to_string()];
    }

    let resolved = engine.load_pictograms(&session.words, variant);
    let mut status: Vec<String> = resolved
        .iter()
        .map(|r| format!("  {} -> {}", r.source, r.path.display()))
        .collect();

    let images: Vec<DynamicImage> = resolved.into_iter().map(|r| r.payload).collect();
    match gallery.present(&images) {
        Ok(()) => {
            if let Some(open) = gallery.current() {
                status.push(format!(
                    "{} de {} palabras con pictograma. Galería: {}",
                    open.tiles(),
                    session.words.len(),
                    open.path().display()
                ));
            }
        }
        Err(e) => {
            error!("Gallery failed: {}", e);
            status.push(format!("Error: {}", e));
        }
    }
    status
}

fn confirm_quit<B: BufRead>(lines: &mut io::Lines<B>) -> io::Result<bool> {
    print!("{} ", style("¿Quieres salir? [s/N]").bold());
    stdout().flush()?;
    let answer = match lines.next() {
        Some(line) => line?,
        None => return Ok(true),
    };
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "s" | "si" | "sí" | "y" | "yes"
    ))
}

fn print_ui(
    session: &Session,
    variant: PictogramVariant,
    policy: ResolutionPolicy,
    status: &[String],
) -> io::Result<()> {
    let mut out = stdout();
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;

    println!("{}", style("Convertir frases a pictogramas").bold());
    println!("---------------------------------------------------------------");
    println!("Escribe una frase y pulsa [Enter]. Órdenes: ':show', ':clear',");
    println!("':level bn|color', ':policy pair|single', ':quit'.\n");

    println!("Frase: [{}]", session.sentence);
    println!(
        "Palabras relevantes: {}",
        style(session.words.join(" ")).green()
    );
    println!("Nivel: {}   Política: {:?}\n", variant, policy);

    for line in status {
        println!("{}", line);
    }
    print!("\n> ");
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn answer(input: &str) -> bool {
        confirm_quit(&mut Cursor::new(input.as_bytes()).lines()).unwrap()
    }

    #[test]
    fn quit_needs_a_yes() {
        assert!(answer("s\n"));
        assert!(answer("Sí\n"));
        assert!(!answer("n\n"));
        assert!(!answer("\n"));
    }

    #[test]
    fn exhausted_input_confirms_quit() {
        assert!(answer(""));
    }
}
