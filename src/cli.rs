use crate::libtaimal::catalog::{Catalog, Category};
use crate::libtaimal::munje::{build_questions, QuizMode};
use crate::libtaimal::session::{Phase, QuizSession, SessionView};
use colored::Colorize;
use log::{debug, warn};
use rand::Rng;
use text_io::read;

// The screen union the quiz binary walks through. All quiz truth is read
// back out of the QuizSession; the screens only render and forward choices.
enum Screen {
    Categories,
    Study { category: usize },
    Quiz { category: usize, session: QuizSession },
    Results { category: usize, session: QuizSession },
    Done,
}

enum StudyChoice {
    Start,
    Home,
    Quit,
}

pub fn run<R: Rng + ?Sized>(
    rng: &mut R,
    catalog: &Catalog,
    mode: QuizMode,
    question_count: Option<usize>,
    preselected: Option<usize>,
) {
    let mut screen = match preselected {
        Some(category) => Screen::Study { category },
        None => Screen::Categories,
    };

    loop {
        screen = match screen {
            Screen::Categories => pick_category(catalog),
            Screen::Study { category } => match study(&catalog.categories[category]) {
                StudyChoice::Start => start_quiz(rng, catalog, mode, question_count, category),
                StudyChoice::Home => Screen::Categories,
                StudyChoice::Quit => Screen::Done,
            },
            Screen::Quiz { category, session } => quiz(session, category),
            Screen::Results { category, session } => {
                results(rng, catalog, mode, question_count, category, session)
            }
            Screen::Done => break,
        };
    }
}

fn start_quiz<R: Rng + ?Sized>(
    rng: &mut R,
    catalog: &Catalog,
    mode: QuizMode,
    question_count: Option<usize>,
    category: usize,
) -> Screen {
    let cat = &catalog.categories[category];
    let questions = build_questions(rng, &cat.items, mode, question_count);
    match QuizSession::start(questions, mode) {
        Some(session) => Screen::Quiz { category, session },
        None => {
            warn!("[Quiz] Category '{}' produced no questions.", cat.id);
            println!("{}", "이 카테고리는 지금 이용할 수 없어요.".yellow());
            Screen::Categories
        }
    }
}

fn pick_category(catalog: &Catalog) -> Screen {
    println!();
    println!("{}", "무엇을 연습할까요?".cyan().bold());
    for (idx, category) in catalog.categories.iter().enumerate() {
        println!(
            "  {} {} — {}",
            format!("{}.", idx + 1).bold(),
            category.heading(),
            category.subtitle
        );
    }
    print!("{} ", "번호를 고르세요 (q: 종료):".cyan());
    let input: String = read!("{}\n");
    match input.trim() {
        "q" => Screen::Done,
        input => match input.parse::<usize>() {
            Ok(num) if (1..=catalog.categories.len()).contains(&num) => {
                Screen::Study { category: num - 1 }
            }
            _ => {
                println!("{}", "그 번호는 없어요.".bright_red());
                Screen::Categories
            }
        },
    }
}

fn study(category: &Category) -> StudyChoice {
    println!();
    println!(
        "{}",
        format!("==========> {} <==========", category.heading()).cyan()
    );
    for item in &category.items {
        let mut line = String::new();
        if let Some(emoji) = &item.emoji {
            line.push_str(emoji);
            line.push(' ');
        }
        line.push_str(&format!("{} — {}", item.meaning, item.pronunciation.bold()));
        if let Some(roman) = &item.roman {
            line.push_str(&format!(" ({})", roman));
        }
        println!("  {}", line);
        if let Some(script) = &item.script {
            println!("      {}", script.dimmed());
        }
    }
    print!("{} ", "퀴즈 시작? (Enter: 시작, h: 홈, q: 종료):".cyan());
    let input: String = read!("{}\n");
    match input.trim() {
        "q" => StudyChoice::Quit,
        "h" => StudyChoice::Home,
        _ => StudyChoice::Start,
    }
}

fn quiz(mut session: QuizSession, category: usize) -> Screen {
    while session.phase() != Phase::Complete {
        let (index, option_count) = {
            let view = session.view().expect("session is not complete");
            render_question(&view);
            (view.index, view.options.len())
        };

        print!("{} ", format!("정답은? (1-{}, q: 홈으로):", option_count).cyan());
        let input: String = read!("{}\n");
        let picked = match input.trim() {
            "q" => {
                // Abandoning mid-quiz discards the session entirely.
                println!("{}", "홈으로 돌아갑니다.".cyan());
                return Screen::Categories;
            }
            input => input
                .parse::<usize>()
                .ok()
                .filter(|n| (1..=option_count).contains(n)),
        };

        let Some(num) = picked else {
            println!("{}", "보기 번호 중에서 골라 주세요.".bright_red());
            continue;
        };

        let choice = session
            .view()
            .map(|v| v.options[num - 1].clone())
            .expect("session is not complete");
        session.answer(index, &choice);
        feedback(&session);

        // Advance on an explicit keypress, not a timer.
        print!("{} ", "다음으로 (Enter):".dimmed());
        let _: String = read!("{}\n");
        session.advance();
    }

    debug!("quiz loop finished in phase {:?}", session.phase());
    Screen::Results { category, session }
}

fn render_question(view: &SessionView) {
    let leading = format!("{}/{}. ", view.index + 1, view.total);
    let mut prompt = String::new();
    if let Some(emoji) = view.emoji {
        prompt.push_str(emoji);
        prompt.push(' ');
    }
    prompt.push_str(view.prompt);
    println!();
    println!("{}{}", leading.cyan(), prompt.black().bold().on_white());
    if let Some(roman) = view.roman {
        println!(
            "{}{}",
            " ".repeat(leading.len()),
            format!("({})", roman).dimmed()
        );
    }

    let indent = " ".repeat(leading.len());
    for (i, option) in view.options.iter().enumerate() {
        println!("{}{} {}", indent, format!("{}.", i + 1).bold(), option);
    }
}

fn feedback(session: &QuizSession) {
    let Some(view) = session.view() else { return };
    if !view.locked {
        return;
    }
    if view.selection == view.correct {
        println!("{}", format!("정답! ({}점)", view.score).bright_green());
    } else {
        println!("{}", "오답!".bright_red());
        if let Some(correct) = view.correct {
            println!("{}", format!("정답은 \"{}\" 였어요.", correct).green());
        }
    }
}

fn results<R: Rng + ?Sized>(
    rng: &mut R,
    catalog: &Catalog,
    mode: QuizMode,
    question_count: Option<usize>,
    category: usize,
    session: QuizSession,
) -> Screen {
    let cat = &catalog.categories[category];
    println!();
    println!(
        "{}",
        format!("==========> {} 결과 <==========", cat.heading()).cyan()
    );
    println!(
        "{}",
        format!("{} / {} 문제 정답!", session.score(), session.total()).bold()
    );
    if session.has_missed() {
        println!("{}", "틀린 표현:".yellow());
        for id in session.missed_ids() {
            if let Some(item) = cat.items.iter().find(|i| &i.id == id) {
                println!("  {} — {}", item.meaning, item.pronunciation.bold());
            }
        }
        print!("{} ", "r: 틀린 것만 복습, a: 다시 풀기, h: 홈, q: 종료:".cyan());
    } else {
        println!("{}", "다 맞았어요! 복습할 게 없네요.".bright_green());
        print!("{} ", "a: 다시 풀기, h: 홈, q: 종료:".cyan());
    }

    let input: String = read!("{}\n");
    match input.trim() {
        "r" => match session.review_missed(rng, &cat.items) {
            Some(review) => Screen::Quiz {
                category,
                session: review,
            },
            None => {
                println!("{}", "복습할 문제가 없어요.".yellow());
                Screen::Results { category, session }
            }
        },
        "a" => start_quiz(rng, catalog, mode, question_count, category),
        "q" => Screen::Done,
        _ => Screen::Categories,
    }
}
