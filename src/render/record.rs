use std::fmt::Display;

use nalgebra::Matrix4;

use super::{ClientStream, DrawContext, DrawMode, IndexWidth};

/// A single call made against a [DrawContext], with owned copies of any bound data.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    PushMatrix,
    PopMatrix,
    MultMatrix(Matrix4<f32>),
    VertexPointer { size: usize, data: Vec<f32> },
    Enable(ClientStream),
    Disable(ClientStream),
    ColorPointer { size: usize, data: Vec<u8> },
    NormalPointer { data: Vec<f32> },
    DrawElements {
        mode: DrawMode,
        count: usize,
        width: IndexWidth,
        indices: Vec<u16>,
    },
}

impl Display for DrawCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrawCommand::PushMatrix => f.write_str("push_matrix"),
            DrawCommand::PopMatrix => f.write_str("pop_matrix"),
            DrawCommand::MultMatrix(m) => write!(
                f,
                "mult_matrix (translation: {}, {}, {})",
                m[(0, 3)],
                m[(1, 3)],
                m[(2, 3)]
            ),
            DrawCommand::VertexPointer { size, data } => {
                write!(f, "vertex_pointer {size} x {}", data.len() / (*size).max(1))
            }
            DrawCommand::Enable(s) => write!(f, "enable {s:?}"),
            DrawCommand::Disable(s) => write!(f, "disable {s:?}"),
            DrawCommand::ColorPointer { size, data } => {
                write!(f, "color_pointer {size} x {}", data.len() / (*size).max(1))
            }
            DrawCommand::NormalPointer { data } => write!(f, "normal_pointer 3 x {}", data.len() / 3),
            DrawCommand::DrawElements {
                mode, count, width, ..
            } => write!(f, "draw_elements {mode:?} {count} {width:?}"),
        }
    }
}

/// A [DrawContext] which records every call instead of drawing.
///
/// Tracks transform stack depth and enabled streams so that unbalanced call sequences are easy
/// to spot.
#[derive(Debug, Default, Clone)]
pub struct CommandLog {
    commands: Vec<DrawCommand>,
    depth: isize,
    enabled: Vec<ClientStream>,
}

impl CommandLog {
    #[inline]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Current transform stack depth; 0 when every push has been matched by a pop.
    #[inline]
    pub fn depth(&self) -> isize {
        self.depth
    }

    /// Streams enabled and not yet disabled.
    #[inline]
    pub fn enabled(&self) -> &[ClientStream] {
        &self.enabled
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.depth = 0;
        self.enabled.clear();
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }
}

impl DrawContext for CommandLog {
    fn push_matrix(&mut self) {
        self.depth += 1;
        self.commands.push(DrawCommand::PushMatrix);
    }

    fn pop_matrix(&mut self) {
        self.depth -= 1;
        self.commands.push(DrawCommand::PopMatrix);
    }

    fn mult_matrix(&mut self, m: &Matrix4<f32>) {
        self.commands.push(DrawCommand::MultMatrix(*m));
    }

    fn vertex_pointer(&mut self, size: usize, vertices: &[f32]) {
        self.commands.push(DrawCommand::VertexPointer {
            size,
            data: vertices.to_vec(),
        });
    }

    fn enable_stream(&mut self, stream: ClientStream) {
        if !self.enabled.contains(&stream) {
            self.enabled.push(stream);
        }
        self.commands.push(DrawCommand::Enable(stream));
    }

    fn disable_stream(&mut self, stream: ClientStream) {
        self.enabled.retain(|&s| s != stream);
        self.commands.push(DrawCommand::Disable(stream));
    }

    fn color_pointer(&mut self, size: usize, colors: &[u8]) {
        self.commands.push(DrawCommand::ColorPointer {
            size,
            data: colors.to_vec(),
        });
    }

    fn normal_pointer(&mut self, normals: &[f32]) {
        self.commands.push(DrawCommand::NormalPointer {
            data: normals.to_vec(),
        });
    }

    fn draw_elements(&mut self, mode: DrawMode, count: usize, width: IndexWidth, indices: &[u16]) {
        self.commands.push(DrawCommand::DrawElements {
            mode,
            count,
            width,
            indices: indices.to_vec(),
        });
    }
}
