use rand::Rng;

use super::decode::Instruction;
use super::error::Fault;
use super::font::{FONT_ADDR, GLYPH_SIZE};
use super::{ChipState, HEIGHT, STACK_DEPTH, WIDTH};

fn illegal(i: Instruction) -> Fault {
    Fault::IllegalInstruction { instruction: i.raw }
}

impl ChipState {
    pub(super) fn execute(&mut self, i: Instruction) -> Result<(), Fault> {
        match i.family {
            0x0 => self.execute_system(i)?,
            // 1nnn JP addr: jump to location nnn
            0x1 => self.program_counter = i.nnn,
            // 2nnn CALL addr: call subroutine at nnn
            0x2 => {
                if self.stack_pointer as usize == STACK_DEPTH {
                    return Err(Fault::StackOverflow { address: i.nnn });
                }
                self.stack[self.stack_pointer as usize] = self.program_counter;
                self.stack_pointer += 1;
                self.program_counter = i.nnn;
            }
            // 3xkk SE Vx, byte: skip next instruction if Vx = kk
            0x3 => self.skip_if(self.registers[i.x] == i.kk),
            // 4xkk SNE Vx, byte: skip next instruction if Vx != kk
            0x4 => self.skip_if(self.registers[i.x] != i.kk),
            // 5xy0 SE Vx, Vy: skip next instruction if Vx = Vy
            0x5 if i.n == 0 => self.skip_if(self.registers[i.x] == self.registers[i.y]),
            // 6xkk LD Vx, byte: set Vx = kk
            0x6 => self.registers[i.x] = i.kk,
            // 7xkk ADD Vx, byte: set Vx = Vx + kk, VF untouched
            0x7 => self.registers[i.x] = self.registers[i.x].wrapping_add(i.kk),
            0x8 => self.execute_alu(i)?,
            // 9xy0 SNE Vx, Vy: skip next instruction if Vx != Vy
            0x9 if i.n == 0 => self.skip_if(self.registers[i.x] != self.registers[i.y]),
            // Annn LD I, addr: set I = nnn
            0xA => self.index_register = i.nnn,
            // Bnnn JP V0, addr: jump to nnn + V0
            0xB => self.program_counter = i.nnn + self.registers[0] as u16,
            // Cxkk RND Vx, byte: set Vx = random byte AND kk
            0xC => self.registers[i.x] = self.rng.gen::<u8>() & i.kk,
            0xD => self.draw(i)?,
            0xE => self.execute_key_skip(i)?,
            0xF => self.execute_misc(i)?,
            _ => return Err(illegal(i)),
        }
        Ok(())
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.program_counter += 2;
        }
    }

    fn execute_system(&mut self, i: Instruction) -> Result<(), Fault> {
        match i.raw {
            // 00E0 CLS: clear display
            0x00E0 => {
                self.frame_buffer = [[false; WIDTH]; HEIGHT];
                self.display_dirty = true;
            }
            // 00EE RET: return from subroutine
            0x00EE => {
                self.stack_pointer = self
                    .stack_pointer
                    .checked_sub(1)
                    .ok_or(Fault::StackUnderflow)?;
                self.program_counter = self.stack[self.stack_pointer as usize];
            }
            // 0nnn SYS addr: machine code routine, ignored
            _ => (),
        }
        Ok(())
    }

    fn execute_alu(&mut self, i: Instruction) -> Result<(), Fault> {
        let vx = self.registers[i.x];
        let vy = self.registers[i.y];
        let (result, flag) = match i.n {
            // 8xy0 LD Vx, Vy
            0x0 => (vy, None),
            // 8xy1 OR Vx, Vy
            0x1 => (vx | vy, None),
            // 8xy2 AND Vx, Vy
            0x2 => (vx & vy, None),
            // 8xy3 XOR Vx, Vy
            0x3 => (vx ^ vy, None),
            // 8xy4 ADD Vx, Vy: VF = carry
            0x4 => {
                let (sum, overflow) = vx.overflowing_add(vy);
                (sum, Some(overflow))
            }
            // 8xy5 SUB Vx, Vy: VF = Vx > Vy
            0x5 => (vx.wrapping_sub(vy), Some(vx > vy)),
            // 8xy6 SHR Vx: VF = old bit 0
            0x6 => (vx >> 1, Some(vx & 0x01 != 0)),
            // 8xy7 SUBN Vx, Vy: VF = Vy > Vx
            0x7 => (vy.wrapping_sub(vx), Some(vy > vx)),
            // 8xyE SHL Vx: VF = old bit 7
            0xE => (vx << 1, Some(vx & 0x80 != 0)),
            _ => return Err(illegal(i)),
        };

        self.registers[i.x] = result;
        if let Some(flag) = flag {
            self.set_flag(flag);
        }
        Ok(())
    }

    // Dxyn DRW Vx, Vy, nibble: XOR an n-byte sprite from I onto (Vx, Vy), VF = collision
    fn draw(&mut self, i: Instruction) -> Result<(), Fault> {
        let rows = self.span(self.index_register as usize, i.n as usize)?;
        let x = self.registers[i.x] as usize % WIDTH;
        let y = self.registers[i.y] as usize % HEIGHT;

        let mut collision = false;
        for (dy, row) in self.memory[rows].iter().enumerate() {
            let line = &mut self.frame_buffer[(y + dy) % HEIGHT];
            for dx in 0..8 {
                if row & (0x80_u8 >> dx) == 0 {
                    continue;
                }
                let pixel = &mut line[(x + dx) % WIDTH];
                collision |= *pixel;
                *pixel = !*pixel;
            }
        }

        self.set_flag(collision);
        self.display_dirty = true;
        Ok(())
    }

    fn execute_key_skip(&mut self, i: Instruction) -> Result<(), Fault> {
        match i.kk {
            // Ex9E SKP: skip next instruction if key x is down
            0x9E => self.skip_if(self.key_state[i.x]),
            // ExA1 SKNP: skip next instruction if key x is up
            0xA1 => self.skip_if(!self.key_state[i.x]),
            _ => return Err(illegal(i)),
        }
        Ok(())
    }

    fn execute_misc(&mut self, i: Instruction) -> Result<(), Fault> {
        let x = i.x;
        match i.kk {
            // Fx07 LD Vx, DT
            0x07 => self.registers[x] = self.delay_timer,
            // Fx0A LD Vx, K
            0x0A => self.wait_for_key(x),
            // Fx15 LD DT, Vx
            0x15 => self.delay_timer = self.registers[x],
            // Fx18 LD ST, Vx
            0x18 => self.sound_timer = self.registers[x],
            // Fx1E ADD I, Vx
            0x1E => {
                self.index_register = (self.index_register + self.registers[x] as u16) & 0xFFF;
            }
            // Fx29 LD F, Vx: glyph for the low nibble of Vx
            0x29 => {
                let digit = (self.registers[x] & 0xF) as usize;
                self.index_register = (FONT_ADDR + GLYPH_SIZE * digit) as u16;
            }
            // Fx33 LD B, Vx: hundreds, tens, ones at I, I+1, I+2
            0x33 => {
                let bcd = self.span(self.index_register as usize, 3)?;
                let value = self.registers[x];
                self.memory[bcd].copy_from_slice(&[value / 100, value / 10 % 10, value % 10]);
            }
            // Fx55 LD [I], Vx: store V0..=Vx from I
            0x55 => {
                let block = self.span(self.index_register as usize, x + 1)?;
                self.memory[block].copy_from_slice(&self.registers[..=x]);
            }
            // Fx65 LD Vx, [I]: load V0..=Vx from I
            0x65 => {
                let block = self.span(self.index_register as usize, x + 1)?;
                self.registers[..=x].copy_from_slice(&self.memory[block]);
            }
            _ => return Err(illegal(i)),
        }
        Ok(())
    }
}
