use clap::Parser;
use dice_expr::{EvalContext, Evaluate, Expression, Int};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::io::{self, BufRead, Write};

/// Evaluate dice expressions such as `2d6 + 3` or `max(d20, d20)`.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Seed the random number generator for reproducible rolls
    #[arg(short, long)]
    seed: Option<u64>,

    /// Give up on an evaluation after rolling this many dice
    #[arg(long)]
    max_rolls: Option<usize>,

    /// Bind a variable, e.g. `-D level=3`
    #[arg(short = 'D', long = "define", value_name = "NAME=VALUE", value_parser = parse_binding)]
    bindings: Vec<(String, Int)>,

    /// Evaluate each expression this many times
    #[arg(short = 'n', long, default_value_t = 1)]
    times: usize,

    /// Expression to evaluate; reads expressions from stdin when omitted
    expression: Option<String>,
}

fn parse_binding(s: &str) -> Result<(String, Int), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, found {:?}", s))?;
    let value = value
        .trim()
        .parse()
        .map_err(|why| format!("invalid value for {}: {}", name, why))?;
    Ok((name.trim().to_string(), value))
}

struct Session {
    env: HashMap<String, Int>,
    rng: StdRng,
    max_rolls: Option<usize>,
    times: usize,
}

impl Session {
    fn run(&mut self, expr: &Expression) -> Result<Vec<Int>, dice_expr::EvalError> {
        (0..self.times)
            .map(|_| {
                let mut ctx = EvalContext::new(self.max_rolls, &self.env, &mut self.rng);
                expr.evaluate(&mut ctx)
            })
            .collect()
    }

    fn eval_line(&mut self, line: &str) -> Result<Vec<Int>, dice_expr::Error> {
        let expr = dice_expr::parse(line)?;
        log::debug!("evaluating {}", expr);
        Ok(self.run(&expr)?)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = Session {
        env: args.bindings.into_iter().collect(),
        rng,
        max_rolls: args.max_rolls,
        times: args.times,
    };

    if let Some(expression) = args.expression {
        for value in session.eval_line(&expression)? {
            println!("{}", value);
        }
        return Ok(());
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    print!("> ");
    io::stdout().flush()?;
    while let Some(line) = lines.next() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            match session.eval_line(line) {
                Ok(values) => {
                    for value in values {
                        println!("{}", value);
                    }
                }
                Err(why) => eprintln!("Error: {}", why),
            }
        }
        print!("> ");
        io::stdout().flush()?;
    }
    Ok(())
}
