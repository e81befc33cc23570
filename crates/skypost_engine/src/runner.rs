use skypost_core::{update, Cmd, Model};

use crate::interpreter::Interpreter;

/// Drive one workflow to its terminal state.
///
/// Alternates between executing the requested effect and applying the pure
/// transition until the machine asks for [`Cmd::NoOp`]. Iterative on purpose:
/// the image flow takes seven effect round-trips and the loop must not grow
/// the stack with the flow length.
pub async fn run(interpreter: &Interpreter, model: Model, cmd: Cmd) -> Model {
    let mut model = model;
    let mut cmd = cmd;

    while !matches!(cmd, Cmd::NoOp) {
        let msg = interpreter.execute(cmd).await;
        log::debug!("{} <- {}", model.tag(), msg.tag());
        let (next_model, next_cmd) = update(model, msg);
        model = next_model;
        cmd = next_cmd;
    }

    if let Model::Failed { error } = &model {
        log::warn!("workflow failed: {error}");
    }
    model
}
